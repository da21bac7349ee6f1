use std::collections::BTreeMap;

use serde_json::json;

use coursematch_core::catalog::CatalogError;
use coursematch_core::config::AppConfig;

use super::{build_source, CommandResult};

pub async fn run(config: &AppConfig) -> CommandResult {
    let source = match build_source(config) {
        Ok(source) => source,
        Err(error) => {
            return CommandResult::failure("catalog", "catalog_config", format!("{error:#}"), 2)
        }
    };

    match source.fetch().await {
        Ok(snapshot) => {
            let mut by_level: BTreeMap<String, usize> = BTreeMap::new();
            let mut by_mode: BTreeMap<String, usize> = BTreeMap::new();
            let mut featured = 0usize;
            for program in snapshot.programs() {
                *by_level.entry(program.level.to_string()).or_insert(0) += 1;
                *by_mode.entry(program.mode.to_string()).or_insert(0) += 1;
                if program.featured {
                    featured += 1;
                }
            }
            let fees: Vec<_> = snapshot.programs().iter().map(|program| program.fee).collect();

            CommandResult::success(
                "catalog",
                json!({
                    "size": snapshot.len(),
                    "featured": featured,
                    "by_level": by_level,
                    "by_mode": by_mode,
                    "fee_min": fees.iter().min().map(ToString::to_string),
                    "fee_max": fees.iter().max().map(ToString::to_string),
                }),
            )
        }
        Err(error) => {
            let class = match error {
                CatalogError::Unavailable { .. } => "unavailable",
                CatalogError::Malformed { .. } => "malformed",
            };
            CommandResult::failure("catalog", class, error.to_string(), 3)
        }
    }
}
