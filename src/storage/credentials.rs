//! Provider credential store.
//!
//! A JSON object keyed by provider name. Each entry names the command that
//! prints the provider's quota report and, optionally, a token passed to it
//! and a usage endpoint for the derived used/total fetch:
//!
//! ```json
//! {
//!   "claude": { "command": ["claude-quota", "--plain"] },
//!   "glm": {
//!     "command": ["glm-quota"],
//!     "token": "sk-...",
//!     "usage_url": "https://example.invalid/api/usage",
//!     "timeout_seconds": 20
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::provider::Provider;
use crate::error::{QuotaError, Result};

/// Credential entry for one provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderCredential {
    /// Program followed by its arguments.
    #[serde(default)]
    pub command: Vec<String>,
    /// Secret handed to the command as `QUOTABOARD_TOKEN` and used as the
    /// bearer token for `usage_url`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Endpoint returning `{ "used": n, "total": n }`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_url: Option<String>,
    /// Per-query timeout override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
}

impl ProviderCredential {
    /// Whether the entry names a runnable command.
    #[must_use]
    pub fn is_runnable(&self) -> bool {
        self.command.first().is_some_and(|program| !program.trim().is_empty())
    }

    /// Query timeout, if overridden.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

/// All configured providers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialStore {
    entries: BTreeMap<Provider, ProviderCredential>,
}

impl CredentialStore {
    /// Load the store from `path`.
    ///
    /// # Errors
    /// Returns [`QuotaError::CredentialRead`] if the file is missing,
    /// unreadable or not a JSON object of provider entries.
    pub fn load(path: &Path) -> Result<Self> {
        let read_error = |reason: String| QuotaError::CredentialRead {
            path: path.display().to_string(),
            reason,
        };

        let content = std::fs::read_to_string(path).map_err(|e| read_error(e.to_string()))?;
        let store = Self::from_json(&content).map_err(|e| read_error(e.to_string()))?;

        tracing::debug!(
            path = %path.display(),
            providers = store.entries.len(),
            "Loaded credential store"
        );
        Ok(store)
    }

    /// Parse the store from JSON text. Unknown provider keys are skipped.
    ///
    /// # Errors
    /// Returns an error if the text is not a JSON object of valid entries.
    pub fn from_json(content: &str) -> Result<Self> {
        let raw: BTreeMap<String, serde_json::Value> = serde_json::from_str(content)?;

        let mut entries = BTreeMap::new();
        for (key, value) in raw {
            let Some(provider) = Provider::from_cli_name(&key) else {
                tracing::debug!(key = %key, "Ignoring unknown provider in credential store");
                continue;
            };
            let credential: ProviderCredential = serde_json::from_value(value)?;
            entries.insert(provider, credential);
        }

        Ok(Self { entries })
    }

    /// Build a store from entries directly.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = (Provider, ProviderCredential)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Entry for `provider`, if configured.
    #[must_use]
    pub fn get(&self, provider: Provider) -> Option<&ProviderCredential> {
        self.entries.get(&provider)
    }

    /// Number of configured providers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no provider is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
