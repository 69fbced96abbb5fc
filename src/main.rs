//! quotaboard - AI quota dashboard
//!
//! CLI entry point.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use clap::Parser;
use std::process::ExitCode;

use quotaboard::cli::{self, Cli};
use quotaboard::core::logging::{self, LogSettings};
use quotaboard::storage::config::ResolvedConfig;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    logging::init(&LogSettings::resolve(
        cli.log_level.as_deref(),
        cli.json_output,
        cli.verbose,
    ));

    let result = match ResolvedConfig::resolve(&cli) {
        Ok(config) => cli::execute(&config).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, configuration = e.is_configuration(), "quotaboard failed");
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code() as u8)
        }
    }
}
