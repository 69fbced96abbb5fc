//! Application paths for the config file and credential store.

use directories::ProjectDirs;
use std::path::PathBuf;

/// Application paths.
pub struct AppPaths {
    /// Configuration directory.
    pub config: PathBuf,
}

impl AppPaths {
    /// Create paths for the quotaboard application.
    #[must_use]
    pub fn new() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("dev", "quotaboard", "quotaboard") {
            Self {
                config: proj_dirs.config_dir().to_path_buf(),
            }
        } else {
            // Fallback to home directory
            let home = directories::BaseDirs::new()
                .map_or_else(|| PathBuf::from("."), |d| d.home_dir().to_path_buf());
            Self {
                config: home.join(".config/quotaboard"),
            }
        }
    }

    /// Path to the TOML config file.
    #[must_use]
    pub fn config_file(&self) -> PathBuf {
        self.config.join("config.toml")
    }

    /// Path to the provider credential store.
    #[must_use]
    pub fn credentials_file(&self) -> PathBuf {
        self.config.join("credentials.json")
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
