//! Core data models shared by the query, normalization and render layers.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::provider::Provider;
use crate::error::{QuotaError, Result};

// =============================================================================
// Query results
// =============================================================================

/// Outcome of one provider query.
///
/// `success == true` carries `output`; `success == false` carries `error`
/// or nothing at all (silently dropped).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QueryResult {
    /// Successful query with the provider's report text.
    #[must_use]
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: Some(output.into()),
            error: None,
        }
    }

    /// Failed query with an error message.
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            output: None,
            error: Some(error.into()),
        }
    }
}

/// A used/total fact fetched separately and merged into one provider's report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedUsage {
    pub used: u64,
    pub total: u64,
}

impl DerivedUsage {
    /// Build a derived usage fact, rejecting `total == 0` and `used > total`.
    #[must_use]
    pub const fn new(used: u64, total: u64) -> Option<Self> {
        if total == 0 || used > total {
            None
        } else {
            Some(Self { used, total })
        }
    }
}

// =============================================================================
// Normalized reports
// =============================================================================

/// One provider's quota state after normalization.
///
/// Lines never contain two consecutive blanks and never end with a blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderReport {
    pub provider: Provider,
    pub lines: Vec<String>,
}

impl ProviderReport {
    /// Report text joined with newlines.
    #[must_use]
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// A provider query that failed for a reason worth showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderFailure {
    pub provider: Provider,
    pub message: String,
}

/// Everything one render pass needs.
#[derive(Debug, Clone)]
pub struct Frame {
    pub reports: Vec<ProviderReport>,
    pub failures: Vec<ProviderFailure>,
    pub generated_at: DateTime<Local>,
}

impl Frame {
    /// Whether the fetch produced neither reports nor failures.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty() && self.failures.is_empty()
    }
}

/// Whether a failure only means the provider's local config is absent.
///
/// Such failures are treated exactly like an unconfigured provider.
#[must_use]
pub fn is_ignorable_failure(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("no such file") || lower.contains("file not found") || lower.contains("enoent")
}

// =============================================================================
// Render configuration
// =============================================================================

/// Minimum width a configured cap may request.
pub const MIN_RENDER_WIDTH: u16 = 20;

/// Dashboard regions selectable with `--show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Header,
    Summary,
    AccountQuota,
    Footer,
}

impl Region {
    /// Parse one `--show` token.
    ///
    /// # Errors
    /// Returns [`QuotaError::UnknownShowToken`] for anything unrecognised.
    pub fn from_token(token: &str) -> Result<Self> {
        match token.trim().to_lowercase().as_str() {
            "header" => Ok(Self::Header),
            "summary" => Ok(Self::Summary),
            "dashboard" | "account-quota" | "accountquota" | "quota" => Ok(Self::AccountQuota),
            "footer" => Ok(Self::Footer),
            _ => Err(QuotaError::UnknownShowToken {
                token: token.trim().to_string(),
            }),
        }
    }
}

/// Which dashboard regions render and how wide the dashboard may grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    pub show_header: bool,
    pub show_summary: bool,
    pub show_account_quota: bool,
    pub show_footer: bool,
    pub max_width: Option<u16>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            show_header: true,
            show_summary: true,
            show_account_quota: true,
            show_footer: true,
            max_width: None,
        }
    }
}

impl RenderConfig {
    /// Build from a comma-separated `--show` list; only listed regions render.
    ///
    /// Empty entries are skipped, so `"header,,footer"` is accepted.
    ///
    /// # Errors
    /// Returns [`QuotaError::UnknownShowToken`] on the first unknown token.
    pub fn from_show_list(list: &str, max_width: Option<u16>) -> Result<Self> {
        let tokens: Vec<&str> = list.split(',').filter(|t| !t.trim().is_empty()).collect();
        Self::from_regions(&tokens, max_width)
    }

    /// Build from individual region tokens.
    ///
    /// # Errors
    /// Returns [`QuotaError::UnknownShowToken`] on the first unknown token.
    pub fn from_regions<S: AsRef<str>>(tokens: &[S], max_width: Option<u16>) -> Result<Self> {
        let mut config = Self {
            show_header: false,
            show_summary: false,
            show_account_quota: false,
            show_footer: false,
            max_width,
        };
        for token in tokens {
            match Region::from_token(token.as_ref())? {
                Region::Header => config.show_header = true,
                Region::Summary => config.show_summary = true,
                Region::AccountQuota => config.show_account_quota = true,
                Region::Footer => config.show_footer = true,
            }
        }
        Ok(config)
    }

    /// Whether a region is enabled.
    #[must_use]
    pub const fn shows(&self, region: Region) -> bool {
        match region {
            Region::Header => self.show_header,
            Region::Summary => self.show_summary,
            Region::AccountQuota => self.show_account_quota,
            Region::Footer => self.show_footer,
        }
    }
}
