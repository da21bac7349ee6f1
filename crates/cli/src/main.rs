use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    coursematch_cli::run().await
}
