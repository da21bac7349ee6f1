pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use coursematch_core::audit::{AuditEvent, AuditOutcome, AuditSink};
use coursematch_core::config::{AppConfig, LoadOptions};

#[derive(Debug, Parser)]
#[command(
    name = "coursematch",
    about = "Coursematch program-recommendation CLI",
    long_about = "Run the guided recommendation pipeline against a catalog source, and inspect \
                  the question schema, catalog, and effective configuration.",
    after_help = "Examples:\n  coursematch questions\n  coursematch recommend --answer qualification=12th-pass --answer interest=engineering --answer budget=50k-100k --answer mode=any\n  coursematch catalog"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a coursematch.toml config file")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Replay pre-supplied answers through the wizard and print the shortlist")]
    Recommend {
        #[arg(
            long = "answer",
            value_name = "FIELD=VALUE",
            help = "Answer for one wizard field; repeatable"
        )]
        answers: Vec<String>,
    },
    #[command(about = "Print the effective question schema")]
    Questions,
    #[command(about = "Summarize the configured catalog source")]
    Catalog,
    #[command(about = "Inspect effective configuration values")]
    Config,
}

/// Audit sink that forwards session events to the tracing subscriber, so
/// skipped answers and rejected transitions land in the operator's log.
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn emit(&self, event: AuditEvent) {
        let metadata = format!("{:?}", event.metadata);
        match event.outcome {
            AuditOutcome::Success => tracing::info!(
                event_type = %event.event_type,
                session_id = ?event.session_id,
                %metadata,
                "audit event"
            ),
            AuditOutcome::Rejected => tracing::warn!(
                event_type = %event.event_type,
                session_id = ?event.session_id,
                %metadata,
                "audit event rejected"
            ),
            AuditOutcome::Failed => tracing::error!(
                event_type = %event.event_type,
                session_id = ?event.session_id,
                %metadata,
                "audit event failed"
            ),
        }
    }
}

fn init_logging(config: &AppConfig) {
    use coursematch_core::config::LogFormat::{Compact, Json, Pretty};
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

pub async fn run() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load(LoadOptions {
        config_path: cli.config.clone(),
        ..LoadOptions::default()
    }) {
        Ok(config) => config,
        Err(error) => {
            let result =
                commands::CommandResult::failure("config", "configuration", error.to_string(), 2);
            println!("{}", result.output);
            return ExitCode::from(result.exit_code);
        }
    };
    init_logging(&config);

    let result = match cli.command {
        Command::Recommend { answers } => commands::recommend::run(&config, &answers).await,
        Command::Questions => commands::questions::run(&config),
        Command::Catalog => commands::catalog::run(&config).await,
        Command::Config => commands::config::run(&config),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
