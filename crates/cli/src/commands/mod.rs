pub mod catalog;
pub mod config;
pub mod questions;
pub mod recommend;

use anyhow::Context;
use serde::Serialize;
use serde_json::Value;

use coursematch_catalog::{fixtures, JsonFileCatalogSource};
use coursematch_core::catalog::CatalogSource;
use coursematch_core::config::{AppConfig, CatalogSourceKind};
use coursematch_core::schema::QuestionSchema;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandEnvelope {
    command: String,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, data: Value) -> Self {
        let envelope = CommandEnvelope {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: None,
            data: Some(data),
        };
        Self { exit_code: 0, output: serialize_envelope(envelope) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let envelope = CommandEnvelope {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: Some(message.into()),
            data: None,
        };
        Self { exit_code, output: serialize_envelope(envelope) }
    }
}

fn serialize_envelope(envelope: CommandEnvelope) -> String {
    serde_json::to_string(&envelope).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

pub(crate) fn load_schema(config: &AppConfig) -> anyhow::Result<QuestionSchema> {
    match &config.schema.path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("could not read `{}`", path.display()))?;
            QuestionSchema::from_toml_str(&raw)
                .with_context(|| format!("`{}` is not a valid question schema", path.display()))
        }
        None => Ok(QuestionSchema::built_in()),
    }
}

pub(crate) fn build_source(config: &AppConfig) -> anyhow::Result<Box<dyn CatalogSource>> {
    match config.catalog.source {
        CatalogSourceKind::Fixtures => Ok(Box::new(fixtures::demo_source())),
        CatalogSourceKind::JsonFile => {
            let path = config
                .catalog
                .path
                .as_ref()
                .context("catalog.path is required for a json_file source")?;
            Ok(Box::new(JsonFileCatalogSource::new(path.clone())))
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::CommandResult;

    #[test]
    fn success_envelope_carries_data_and_exit_zero() {
        let result = CommandResult::success("questions", json!({"total_steps": 4}));

        assert_eq!(result.exit_code, 0);
        let parsed: Value = serde_json::from_str(&result.output).expect("valid json");
        assert_eq!(parsed["status"], "ok");
        assert_eq!(parsed["data"]["total_steps"], 4);
        assert!(parsed.get("error_class").is_none());
    }

    #[test]
    fn failure_envelope_carries_class_and_message() {
        let result = CommandResult::failure("recommend", "invalid_answer", "bad field", 2);

        assert_eq!(result.exit_code, 2);
        let parsed: Value = serde_json::from_str(&result.output).expect("valid json");
        assert_eq!(parsed["status"], "error");
        assert_eq!(parsed["error_class"], "invalid_answer");
        assert_eq!(parsed["message"], "bad field");
    }
}
