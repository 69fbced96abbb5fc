//! Configuration file loading and resolution.
//!
//! Loads configuration from:
//! - Linux: `~/.config/quotaboard/config.toml`
//! - macOS: `~/Library/Application Support/dev.quotaboard.quotaboard/config.toml`
//! - Windows: `%APPDATA%/quotaboard/quotaboard/config/config.toml`
//!
//! ```toml
//! [display]
//! show = ["header", "dashboard", "footer"]
//! max_width = 100
//!
//! [watch]
//! interval_minutes = 10
//! ```
//!
//! ## Precedence
//!
//! Settings are resolved with the following precedence (highest first):
//! 1. CLI flags
//! 2. Environment variables
//! 3. Config file
//! 4. Built-in defaults
//!
//! Every source goes through the same validation, so a bad width in the
//! config file fails exactly like a bad `--width`.
//!
//! ## Environment Variables
//!
//! - `QUOTABOARD_INTERVAL`: Watch interval in minutes
//! - `QUOTABOARD_WIDTH`: Maximum dashboard width
//! - `QUOTABOARD_SHOW`: Comma-separated region list
//! - `QUOTABOARD_CREDENTIALS`: Credential store path
//! - `QUOTABOARD_CONFIG`: Override config file path

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::cli::args::Cli;
use crate::core::models::{MIN_RENDER_WIDTH, RenderConfig};
use crate::error::{QuotaError, Result};
use crate::util::env::non_empty_var;

// =============================================================================
// Environment Variable Names
// =============================================================================

/// Environment variable for the watch interval in minutes.
pub const ENV_INTERVAL: &str = "QUOTABOARD_INTERVAL";
/// Environment variable for the width cap.
pub const ENV_WIDTH: &str = "QUOTABOARD_WIDTH";
/// Environment variable for the region list.
pub const ENV_SHOW: &str = "QUOTABOARD_SHOW";
/// Environment variable for the credential store path.
pub const ENV_CREDENTIALS: &str = "QUOTABOARD_CREDENTIALS";
/// Environment variable to override config file path.
pub const ENV_CONFIG: &str = "QUOTABOARD_CONFIG";

/// Default watch interval.
pub const DEFAULT_INTERVAL_MINUTES: u64 = 5;

// =============================================================================
// Validation
// =============================================================================

/// Parse a polling interval in whole minutes (at least 1).
///
/// # Errors
/// Returns [`QuotaError::InvalidInterval`] for anything else.
pub fn parse_interval(value: &str) -> Result<u64> {
    match value.trim().parse::<u64>() {
        Ok(minutes) if minutes >= 1 => Ok(minutes),
        _ => Err(QuotaError::InvalidInterval(value.trim().to_string())),
    }
}

/// Parse a width cap in columns (at least [`MIN_RENDER_WIDTH`]).
///
/// # Errors
/// Returns [`QuotaError::InvalidWidth`] below the minimum and
/// [`QuotaError::UnparsableWidth`] for anything that is not a `u16`.
pub fn parse_width(value: &str) -> Result<u16> {
    let value = value.trim();
    match value.parse::<u16>() {
        Ok(width) if width >= MIN_RENDER_WIDTH => Ok(width),
        Ok(_) => Err(QuotaError::InvalidWidth {
            value: value.to_string(),
            min: MIN_RENDER_WIDTH,
        }),
        Err(_) => Err(QuotaError::UnparsableWidth {
            value: value.to_string(),
            min: MIN_RENDER_WIDTH,
            max: u16::MAX,
        }),
    }
}

// =============================================================================
// Resolved Configuration
// =============================================================================

/// Fully resolved configuration after merging CLI, env vars, and config file.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Keep polling until interrupted.
    pub watch: bool,
    /// Time between fetches in watch mode.
    pub interval: Duration,
    /// Regions and width cap.
    pub render: RenderConfig,
    /// Credential store location.
    pub credentials_path: PathBuf,
    /// Whether `--no-color` was passed.
    pub no_color: bool,
    /// Source of each setting for debugging.
    pub sources: ConfigSources,
}

/// Tracks the source of each configuration value.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    pub interval: ConfigSource,
    pub width: ConfigSource,
    pub show: ConfigSource,
    pub credentials: ConfigSource,
}

/// Where a configuration value came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Value from CLI flag.
    Cli,
    /// Value from environment variable.
    Env,
    /// Value from config file.
    ConfigFile,
    /// Built-in default.
    #[default]
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI flag"),
            Self::Env => write!(f, "environment variable"),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

impl ResolvedConfig {
    /// Resolve final configuration from CLI args, the process environment,
    /// and the config file.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the config file is invalid or any
    /// resolved value fails validation.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        Self::resolve_with(cli, non_empty_var, &AppPaths::new())
    }

    /// Resolve using an explicit environment lookup and path set.
    ///
    /// # Errors
    ///
    /// Same as [`Self::resolve`].
    pub fn resolve_with(
        cli: &Cli,
        env: impl Fn(&str) -> Option<String>,
        paths: &AppPaths,
    ) -> Result<Self> {
        let config_path = env(ENV_CONFIG).map_or_else(|| paths.config_file(), PathBuf::from);
        let config = Config::load_from(&config_path)?;
        config.validate()?;

        let mut sources = ConfigSources::default();

        let interval = Self::resolve_interval(cli, &env, &config, &mut sources.interval)?;
        let max_width = Self::resolve_width(cli, &env, &config, &mut sources.width)?;
        let render = Self::resolve_show(cli, &env, &config, max_width, &mut sources.show)?;
        let credentials_path =
            Self::resolve_credentials(cli, &env, paths, &mut sources.credentials);

        tracing::debug!(
            interval_source = %sources.interval,
            width_source = %sources.width,
            show_source = %sources.show,
            credentials_source = %sources.credentials,
            "Resolved configuration"
        );

        Ok(Self {
            watch: cli.watch,
            interval: Duration::from_secs(interval.saturating_mul(60)),
            render,
            credentials_path,
            no_color: cli.no_color,
            sources,
        })
    }

    /// Resolve the watch interval in minutes.
    fn resolve_interval(
        cli: &Cli,
        env: &impl Fn(&str) -> Option<String>,
        config: &Config,
        source: &mut ConfigSource,
    ) -> Result<u64> {
        // 1. CLI flag
        if let Some(value) = cli.interval.as_deref() {
            *source = ConfigSource::Cli;
            return parse_interval(value);
        }

        // 2. Environment variable
        if let Some(value) = env(ENV_INTERVAL) {
            *source = ConfigSource::Env;
            return parse_interval(&value);
        }

        // 3. Config file (already validated)
        if let Some(minutes) = config.watch.interval_minutes {
            *source = ConfigSource::ConfigFile;
            return Ok(minutes);
        }

        // 4. Default
        *source = ConfigSource::Default;
        Ok(DEFAULT_INTERVAL_MINUTES)
    }

    /// Resolve the optional width cap.
    fn resolve_width(
        cli: &Cli,
        env: &impl Fn(&str) -> Option<String>,
        config: &Config,
        source: &mut ConfigSource,
    ) -> Result<Option<u16>> {
        if let Some(value) = cli.width.as_deref() {
            *source = ConfigSource::Cli;
            return parse_width(value).map(Some);
        }

        if let Some(value) = env(ENV_WIDTH) {
            *source = ConfigSource::Env;
            return parse_width(&value).map(Some);
        }

        if let Some(width) = config.display.max_width {
            *source = ConfigSource::ConfigFile;
            return parse_width(&width.to_string()).map(Some);
        }

        *source = ConfigSource::Default;
        Ok(None)
    }

    /// Resolve the visible regions.
    fn resolve_show(
        cli: &Cli,
        env: &impl Fn(&str) -> Option<String>,
        config: &Config,
        max_width: Option<u16>,
        source: &mut ConfigSource,
    ) -> Result<RenderConfig> {
        if let Some(list) = cli.show.as_deref() {
            *source = ConfigSource::Cli;
            return RenderConfig::from_show_list(list, max_width);
        }

        if let Some(list) = env(ENV_SHOW) {
            *source = ConfigSource::Env;
            return RenderConfig::from_show_list(&list, max_width);
        }

        if let Some(regions) = &config.display.show {
            *source = ConfigSource::ConfigFile;
            return RenderConfig::from_regions(regions, max_width);
        }

        *source = ConfigSource::Default;
        Ok(RenderConfig {
            max_width,
            ..RenderConfig::default()
        })
    }

    /// Resolve the credential store path.
    fn resolve_credentials(
        cli: &Cli,
        env: &impl Fn(&str) -> Option<String>,
        paths: &AppPaths,
        source: &mut ConfigSource,
    ) -> PathBuf {
        if let Some(path) = &cli.credentials {
            *source = ConfigSource::Cli;
            return path.clone();
        }

        if let Some(path) = env(ENV_CREDENTIALS) {
            *source = ConfigSource::Env;
            return PathBuf::from(path);
        }

        *source = ConfigSource::Default;
        paths.credentials_file()
    }
}

// =============================================================================
// Config File
// =============================================================================

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Display settings.
    pub display: DisplayConfig,
    /// Watch mode settings.
    pub watch: WatchConfig,
}

/// Display settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Regions to render.
    pub show: Option<Vec<String>>,
    /// Maximum dashboard width.
    pub max_width: Option<u64>,
}

/// Watch mode settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Minutes between refreshes.
    pub interval_minutes: Option<u64>,
}

impl Config {
    /// Load configuration from a specific path.
    ///
    /// Returns default config if the file doesn't exist.
    /// Returns error only if the file exists but is invalid.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(?path, "Config file not found, using defaults");
            return Ok(Self::default());
        }

        tracing::debug!(?path, "Loading config file");
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| QuotaError::Config(format!("Invalid config file: {e}")))?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    /// Returns the same error the equivalent CLI flag would.
    pub fn validate(&self) -> Result<()> {
        if let Some(minutes) = self.watch.interval_minutes {
            parse_interval(&minutes.to_string())?;
        }
        if let Some(width) = self.display.max_width {
            parse_width(&width.to_string())?;
        }
        if let Some(regions) = &self.display.show {
            RenderConfig::from_regions(regions, None)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Region;
    use crate::test_utils::make_test_config_toml;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn paths(dir: &TempDir) -> AppPaths {
        AppPaths {
            config: dir.path().to_path_buf(),
        }
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn interval_validation() {
        assert_eq!(parse_interval("5").unwrap(), 5);
        assert_eq!(parse_interval(" 12 ").unwrap(), 12);
        assert!(matches!(parse_interval("0"), Err(QuotaError::InvalidInterval(_))));
        assert!(matches!(parse_interval("-3"), Err(QuotaError::InvalidInterval(_))));
        assert!(matches!(parse_interval("1.5"), Err(QuotaError::InvalidInterval(_))));
    }

    #[test]
    fn width_validation() {
        assert_eq!(parse_width("20").unwrap(), 20);
        assert!(matches!(
            parse_width("19"),
            Err(QuotaError::InvalidWidth { min: 20, .. })
        ));
        assert!(matches!(
            parse_width("wide"),
            Err(QuotaError::UnparsableWidth { .. })
        ));
        assert!(matches!(
            parse_width("70000"),
            Err(QuotaError::UnparsableWidth { max: 65535, .. })
        ));
        assert_eq!(parse_width("65535").unwrap(), u16::MAX);
    }

    #[test]
    fn oversized_config_file_width_is_unparsable() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.toml"), "[display]\nmax_width = 100000\n").unwrap();
        let err = ResolvedConfig::resolve_with(&Cli::default(), no_env, &paths(&dir)).unwrap_err();
        assert!(matches!(err, QuotaError::UnparsableWidth { ref value, .. } if value == "100000"));
    }

    #[test]
    fn sample_config_file_resolves() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.toml"), make_test_config_toml()).unwrap();
        let resolved = ResolvedConfig::resolve_with(&Cli::default(), no_env, &paths(&dir)).unwrap();
        assert_eq!(resolved.interval, Duration::from_secs(120));
        assert_eq!(resolved.render.max_width, Some(72));
        assert!(resolved.render.shows(Region::Header));
        assert!(resolved.render.shows(Region::AccountQuota));
        assert!(resolved.render.shows(Region::Footer));
        assert!(!resolved.render.shows(Region::Summary));
        assert_eq!(resolved.sources.interval, ConfigSource::ConfigFile);
        assert_eq!(resolved.sources.show, ConfigSource::ConfigFile);
    }

    #[test]
    fn defaults_without_any_source() {
        let dir = TempDir::new().unwrap();
        let resolved = ResolvedConfig::resolve_with(&Cli::default(), no_env, &paths(&dir)).unwrap();
        assert!(!resolved.watch);
        assert_eq!(resolved.interval, Duration::from_secs(300));
        assert_eq!(resolved.render, RenderConfig::default());
        assert_eq!(resolved.credentials_path, dir.path().join("credentials.json"));
        assert_eq!(resolved.sources.interval, ConfigSource::Default);
    }

    #[test]
    fn config_file_values_apply() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("config.toml"),
            "[display]\nshow = [\"dashboard\"]\nmax_width = 90\n\n[watch]\ninterval_minutes = 2\n",
        )
        .unwrap();
        let resolved = ResolvedConfig::resolve_with(&Cli::default(), no_env, &paths(&dir)).unwrap();
        assert_eq!(resolved.interval, Duration::from_secs(120));
        assert_eq!(resolved.render.max_width, Some(90));
        assert!(!resolved.render.show_header);
        assert!(resolved.render.show_account_quota);
        assert_eq!(resolved.sources.show, ConfigSource::ConfigFile);
    }

    #[test]
    fn env_beats_config_file_and_cli_beats_env() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.toml"), "[watch]\ninterval_minutes = 2\n").unwrap();
        let env = env_of(&[(ENV_INTERVAL, "7"), (ENV_WIDTH, "40")]);

        let resolved = ResolvedConfig::resolve_with(&Cli::default(), &env, &paths(&dir)).unwrap();
        assert_eq!(resolved.interval, Duration::from_secs(420));
        assert_eq!(resolved.sources.interval, ConfigSource::Env);

        let cli = Cli {
            interval: Some("1".to_string()),
            ..Cli::default()
        };
        let resolved = ResolvedConfig::resolve_with(&cli, &env, &paths(&dir)).unwrap();
        assert_eq!(resolved.interval, Duration::from_secs(60));
        assert_eq!(resolved.render.max_width, Some(40));
    }

    #[test]
    fn invalid_config_file_width_is_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.toml"), "[display]\nmax_width = 10\n").unwrap();
        let err = ResolvedConfig::resolve_with(&Cli::default(), no_env, &paths(&dir)).unwrap_err();
        assert!(matches!(err, QuotaError::InvalidWidth { .. }));
    }

    #[test]
    fn unknown_show_token_is_rejected() {
        let dir = TempDir::new().unwrap();
        let cli = Cli {
            show: Some("header,sidebar".to_string()),
            ..Cli::default()
        };
        let err = ResolvedConfig::resolve_with(&cli, no_env, &paths(&dir)).unwrap_err();
        assert!(matches!(err, QuotaError::UnknownShowToken { token } if token == "sidebar"));
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.toml"), "[display\n").unwrap();
        let err = ResolvedConfig::resolve_with(&Cli::default(), no_env, &paths(&dir)).unwrap_err();
        assert!(matches!(err, QuotaError::Config(_)));
    }

    #[test]
    fn config_env_var_overrides_file_location() {
        let dir = TempDir::new().unwrap();
        let custom = dir.path().join("custom.toml");
        fs::write(&custom, "[watch]\ninterval_minutes = 9\n").unwrap();
        let vars = [(ENV_CONFIG, custom.to_str().unwrap())];
        let env = env_of(&vars);
        let resolved = ResolvedConfig::resolve_with(&Cli::default(), env, &paths(&dir)).unwrap();
        assert_eq!(resolved.interval, Duration::from_secs(540));
    }

    #[test]
    fn credentials_path_precedence() {
        let dir = TempDir::new().unwrap();
        let env = env_of(&[(ENV_CREDENTIALS, "/env/creds.json")]);
        let resolved = ResolvedConfig::resolve_with(&Cli::default(), &env, &paths(&dir)).unwrap();
        assert_eq!(resolved.credentials_path, PathBuf::from("/env/creds.json"));

        let cli = Cli {
            credentials: Some(PathBuf::from("/cli/creds.json")),
            ..Cli::default()
        };
        let resolved = ResolvedConfig::resolve_with(&cli, &env, &paths(&dir)).unwrap();
        assert_eq!(resolved.credentials_path, PathBuf::from("/cli/creds.json"));
        assert_eq!(resolved.sources.credentials, ConfigSource::Cli);
    }
}
