//! HTTP client utilities and the derived-usage fetch.

use std::time::Duration;

use reqwest::{Client, ClientBuilder};
use serde::Deserialize;

use super::models::DerivedUsage;
use crate::error::{QuotaError, Result};
use crate::storage::credentials::ProviderCredential;

/// Fixed timeout for the derived-usage request.
pub const DERIVED_USAGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Build a configured HTTP client.
///
/// # Errors
///
/// Returns error if client construction fails.
pub fn build_client(timeout: Duration) -> Result<Client> {
    ClientBuilder::new()
        .timeout(timeout)
        .user_agent(format!("quotaboard/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| QuotaError::Config(format!("HTTP client: {e}")))
}

/// Usage endpoint payload. Accepts `used`/`usage` and `total`/`limit`.
#[derive(Debug, Deserialize)]
struct UsagePayload {
    #[serde(alias = "usage")]
    used: serde_json::Value,
    #[serde(alias = "limit")]
    total: serde_json::Value,
}

/// A non-negative whole number from a JSON number or numeric string.
fn as_count(value: &serde_json::Value) -> Option<u64> {
    match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(round_count)),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok().and_then(|f| {
            (f.is_finite() && f >= 0.0).then(|| round_count(f))
        }),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // checked non-negative
fn round_count(value: f64) -> u64 {
    value.round() as u64
}

/// Parse a usage payload body into a derived usage fact.
#[must_use]
pub fn parse_derived_usage(body: &str) -> Option<DerivedUsage> {
    let payload: UsagePayload = serde_json::from_str(body).ok()?;
    DerivedUsage::new(as_count(&payload.used)?, as_count(&payload.total)?)
}

/// Fetch the derived used/total fact for a credential.
///
/// Every failure (no URL, network error, timeout, bad status, bad body,
/// invalid numbers) yields `None` and is logged at debug level.
pub async fn fetch_derived_usage(credential: &ProviderCredential) -> Option<DerivedUsage> {
    let url = credential.usage_url.as_deref()?;

    let client = match build_client(DERIVED_USAGE_TIMEOUT) {
        Ok(client) => client,
        Err(e) => {
            tracing::debug!(error = %e, "Derived usage client unavailable");
            return None;
        }
    };

    let mut request = client.get(url);
    if let Some(token) = credential.token.as_deref() {
        request = request.bearer_auth(token);
    }

    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!(url, timeout = e.is_timeout(), error = %e, "Derived usage request failed");
            return None;
        }
    };

    if !response.status().is_success() {
        tracing::debug!(url, status = %response.status(), "Derived usage request rejected");
        return None;
    }

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            tracing::debug!(url, error = %e, "Derived usage body unreadable");
            return None;
        }
    };

    let usage = parse_derived_usage(&body);
    if usage.is_none() {
        tracing::debug!(url, "Derived usage payload invalid");
    }
    usage
}
