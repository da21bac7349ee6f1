use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::json;

use coursematch_core::config::AppConfig;
use coursematch_core::errors::{ApplicationError, InterfaceError};
use coursematch_core::session::RecommendationSession;

use super::{build_source, load_schema, CommandResult};
use crate::TracingAuditSink;

pub async fn run(config: &AppConfig, raw_answers: &[String]) -> CommandResult {
    let schema = match load_schema(config) {
        Ok(schema) => schema,
        Err(error) => {
            return CommandResult::failure("recommend", "schema", format!("{error:#}"), 2)
        }
    };
    let source = match build_source(config) {
        Ok(source) => source,
        Err(error) => {
            return CommandResult::failure("recommend", "catalog_config", format!("{error:#}"), 2)
        }
    };
    let answers = match parse_answers(raw_answers) {
        Ok(answers) => answers,
        Err(message) => return CommandResult::failure("recommend", "invalid_answer", message, 2),
    };

    let mut session =
        RecommendationSession::new(Arc::new(schema), source, Arc::new(TracingAuditSink));

    for field in answers.keys() {
        if !session.schema().contains_field(&coursematch_core::schema::FieldKey::new(field.clone()))
        {
            tracing::warn!(%field, "ignoring answer for a field the schema does not ask about");
        }
    }

    // Replay the answers through the wizard in schema order, so the same
    // validation gates an interactive presenter would hit apply here too.
    let questions = session.schema().questions().to_vec();
    for question in questions {
        let Some(value) = answers.get(&question.field.0) else {
            return CommandResult::failure(
                "recommend",
                "incomplete_answers",
                format!("missing --answer for field `{}` (step {})", question.field, question.step),
                2,
            );
        };
        if let Err(error) = session.select_option(question.field.clone(), value.clone()) {
            return CommandResult::failure("recommend", "invalid_answer", error.to_string(), 2);
        }
    }
    if let Err(error) = session.submit() {
        return CommandResult::failure("recommend", "invalid_transition", error.to_string(), 2);
    }

    match session.recommend().await {
        Ok(recommendation) => {
            for skip in &recommendation.skipped {
                tracing::warn!(
                    field = %skip.field,
                    value = %skip.value,
                    reason = ?skip.reason,
                    "answer derived no constraint"
                );
            }

            let progress = session
                .progress()
                .map(|(step, total)| json!({ "step": step, "total": total }));
            CommandResult::success(
                "recommend",
                json!({
                    "progress": progress,
                    "outcome": recommendation.outcome,
                    "skipped": recommendation.skipped,
                }),
            )
        }
        Err(error) => {
            let detail = error.to_string();
            let interface =
                ApplicationError::from(error).into_interface(session.id().to_string());
            let (class, exit_code) = match &interface {
                InterfaceError::BadRequest { .. } => ("bad_request", 2),
                InterfaceError::ServiceUnavailable { .. } => ("catalog_unavailable", 3),
                InterfaceError::Internal { .. } => ("internal", 1),
            };
            CommandResult::failure(
                "recommend",
                class,
                format!("{}: {detail}", interface.user_message()),
                exit_code,
            )
        }
    }
}

fn parse_answers(raw_answers: &[String]) -> Result<BTreeMap<String, String>, String> {
    let mut answers = BTreeMap::new();
    for raw in raw_answers {
        let Some((field, value)) = raw.split_once('=') else {
            return Err(format!("invalid --answer `{raw}` (expected FIELD=VALUE)"));
        };
        let field = field.trim();
        let value = value.trim();
        if field.is_empty() || value.is_empty() {
            return Err(format!("invalid --answer `{raw}` (empty field or value)"));
        }
        if answers.insert(field.to_string(), value.to_string()).is_some() {
            return Err(format!("duplicate --answer for field `{field}`"));
        }
    }
    Ok(answers)
}
