//! Diagnostic logging via `tracing`.
//!
//! Logs go to stderr (or `QUOTABOARD_LOG_FILE`) and default to `error`, so
//! the dashboard on stdout is never interleaved with chatter.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::util::env::non_empty_var;

pub const LOG_LEVEL_ENV: &str = "QUOTABOARD_LOG";
pub const LOG_FORMAT_ENV: &str = "QUOTABOARD_LOG_FORMAT";
pub const LOG_FILE_ENV: &str = "QUOTABOARD_LOG_FILE";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable logs.
    #[default]
    Human,
    /// JSON logs (one event per line).
    Json,
    /// Compact logs (single line, terse).
    Compact,
}

impl LogFormat {
    /// Parse from string (case-insensitive).
    #[must_use]
    pub fn from_arg(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "human" => Some(Self::Human),
            "json" => Some(Self::Json),
            "compact" => Some(Self::Compact),
            _ => None,
        }
    }
}

/// Parse a level name; `verbose` and `critical` are accepted aliases.
#[must_use]
pub fn parse_level(s: &str) -> Option<Level> {
    match s.trim().to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "verbose" | "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" | "critical" | "crit" => Some(Level::ERROR),
        _ => None,
    }
}

/// Resolved logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: Level,
    pub format: LogFormat,
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: Level::ERROR,
            format: LogFormat::Human,
            file: None,
        }
    }
}

impl LogSettings {
    /// Combine CLI flags with the environment.
    ///
    /// Level: `--log-level`, then `QUOTABOARD_LOG`, then `--verbose` (debug),
    /// then error. Format: `--json-output`, then `QUOTABOARD_LOG_FORMAT`.
    #[must_use]
    pub fn resolve(cli_level: Option<&str>, json_output: bool, verbose: bool) -> Self {
        let level = cli_level
            .and_then(parse_level)
            .or_else(|| non_empty_var(LOG_LEVEL_ENV).as_deref().and_then(parse_level))
            .unwrap_or(if verbose { Level::DEBUG } else { Level::ERROR });

        let format = if json_output {
            LogFormat::Json
        } else {
            non_empty_var(LOG_FORMAT_ENV)
                .as_deref()
                .and_then(LogFormat::from_arg)
                .unwrap_or_default()
        };

        Self {
            level,
            format,
            file: non_empty_var(LOG_FILE_ENV).map(PathBuf::from),
        }
    }

    /// Filter directive for this crate.
    #[must_use]
    pub fn directive(&self) -> String {
        format!("quotaboard={}", self.level.as_str().to_lowercase())
    }
}

/// Initialize the global subscriber. Later calls are no-ops.
pub fn init(settings: &LogSettings) {
    let file = settings.file.as_ref().and_then(|path| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
    });

    let writer = file.map_or_else(
        || BoxMakeWriter::new(std::io::stderr),
        |file| BoxMakeWriter::new(Mutex::new(file)),
    );
    let filter = EnvFilter::try_new(settings.directive())
        .unwrap_or_else(|_| EnvFilter::new("quotaboard=error"));

    match settings.format {
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .with_writer(writer)
                .try_init()
                .ok();
        }
        LogFormat::Compact => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .compact()
                .with_writer(writer)
                .with_target(true)
                .try_init()
                .ok();
        }
        LogFormat::Human => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_target(false)
                .without_time()
                .try_init()
                .ok();
        }
    }
}
