use serde_json::json;

use coursematch_core::config::AppConfig;

use super::{load_schema, CommandResult};

pub fn run(config: &AppConfig) -> CommandResult {
    match load_schema(config) {
        Ok(schema) => CommandResult::success(
            "questions",
            json!({
                "total_steps": schema.total_steps(),
                "questions": schema.questions(),
            }),
        ),
        Err(error) => CommandResult::failure("questions", "schema", format!("{error:#}"), 2),
    }
}
