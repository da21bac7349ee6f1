use coursematch_core::config::AppConfig;

use super::CommandResult;

pub fn run(config: &AppConfig) -> CommandResult {
    match serde_json::to_value(config) {
        Ok(value) => CommandResult::success("config", value),
        Err(error) => CommandResult::failure("config", "serialization", error.to_string(), 1),
    }
}
