//! CLI argument definitions using clap.
//!
//! Numeric and region flags are taken as text and validated during
//! configuration resolution, so a bad value is a configuration error
//! (exit 1) rather than a usage error.

use std::path::PathBuf;

use clap::Parser;

/// Terminal dashboard for AI subscription quotas.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "quotaboard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Keep running and refresh the dashboard every interval
    #[arg(long, short = 'w')]
    pub watch: bool,

    /// Minutes between refreshes in watch mode [default: 5]
    #[arg(long, value_name = "MINUTES")]
    pub interval: Option<String>,

    /// Regions to render: header, summary, dashboard (account-quota), footer
    #[arg(long, value_name = "LIST")]
    pub show: Option<String>,

    /// Maximum dashboard width in columns (at least 20)
    #[arg(long, value_name = "COLUMNS")]
    pub width: Option<String>,

    /// Path to the provider credential store
    #[arg(long, value_name = "PATH")]
    pub credentials: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Log level
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Emit JSONL logs to stderr
    #[arg(long)]
    pub json_output: bool,

    /// Verbose output (sets log level to debug)
    #[arg(short, long)]
    pub verbose: bool,
}
