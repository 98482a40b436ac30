//! Binary crate for the `weather` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Wiring the OpenWeatherMap client to the report formatter
//! - Mapping outcomes (success, failure, Ctrl-C) to exit codes

use std::process::ExitCode;

mod cli;
mod logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cmd = cli::Cli::from_env_args();
    logging::init();

    // Without a signal handler the run simply cannot be interrupted.
    let interrupted = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    let outcome = cmd.execute(interrupted).await;
    outcome.emit();
    ExitCode::from(outcome.exit_code())
}
