//! `simile` -- Simile build notification CLI.
//!
//! Validates job settings and, at the end of a CI build, tells the Simile
//! service which repository and branch were built so it can run a
//! similar-component search.
//!
//! # Environment variables
//!
//! | Variable              | Required | Default       | Description                          |
//! |-----------------------|----------|---------------|--------------------------------------|
//! | `SIMILE_CONFIG`       | no       | `simile.json` | Settings file with the server URL    |
//! | `SIMILE_URL`          | no       | --            | Base URL override for `notify`       |
//! | `SIMILE_REPOSITORY`   | no       | --            | Repository for `notify`              |
//! | `SIMILE_BRANCH`       | no       | --            | Branch for `notify`                  |
//! | `SIMILE_EMAIL`        | no       | --            | Contact email for `notify`           |
//! | `SIMILE_TIMEOUT_SECS` | no       | --            | Request timeout for `notify`         |

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use simile_cli::cli::Cli;
use simile_cli::commands::{self, Exit};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Diagnostics go to stderr; stdout carries the build log.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "simile_cli=info,simile_notifier=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match commands::run(cli, std::io::stdout().lock()).await {
        Ok(Exit::Success) => ExitCode::SUCCESS,
        Ok(Exit::Invalid) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
