//! Provider queries and frame building.
//!
//! Each configured provider's command is run as a subprocess; all commands
//! plus the derived-usage fetch run concurrently and are joined before a
//! frame is built. Rendering never starts on a partial fan-out.

use std::process::Stdio;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::time::timeout;

use super::http::fetch_derived_usage;
use super::models::{
    DerivedUsage, Frame, ProviderFailure, QueryResult, is_ignorable_failure,
};
use super::provider::Provider;
use crate::normalize::normalize_report;
use crate::storage::credentials::{CredentialStore, ProviderCredential};

/// Default timeout for a provider command.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable carrying the provider token into its command.
pub const TOKEN_ENV: &str = "QUOTABOARD_TOKEN";

/// Output from a provider command.
#[derive(Debug)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandOutput {
    /// Check if command succeeded (exit code 0).
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }

    fn into_query_result(self) -> QueryResult {
        if self.success() {
            return QueryResult::ok(self.stdout);
        }
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            QueryResult::failed(format!("exited with code {}", self.exit_code))
        } else {
            QueryResult::failed(stderr)
        }
    }
}

/// Run one provider command and turn its outcome into a [`QueryResult`].
///
/// Returns `None` when the entry has no command, meaning the provider is
/// not configured.
pub async fn query_provider(provider: Provider, credential: &ProviderCredential) -> Option<QueryResult> {
    if !credential.is_runnable() {
        tracing::debug!(provider = %provider, "No command configured");
        return None;
    }

    let program = &credential.command[0];
    let args = &credential.command[1..];
    let timeout_duration = credential.timeout().unwrap_or(QUERY_TIMEOUT);

    tracing::debug!(provider = %provider, program = %program, "Querying provider");
    let start = Instant::now();

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(token) = credential.token.as_deref() {
        command.env(TOKEN_ENV, token);
    }

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Some(QueryResult::failed(format!("No such file or directory: {program}")));
        }
        Err(e) => return Some(QueryResult::failed(format!("failed to start {program}: {e}"))),
    };

    let result = timeout(timeout_duration, async {
        // Read both pipes concurrently so a full buffer on one cannot stall the child.
        let stdout_handle = async {
            let mut stdout = String::new();
            if let Some(mut out) = child.stdout.take() {
                out.read_to_string(&mut stdout).await?;
            }
            Ok::<_, std::io::Error>(stdout)
        };

        let stderr_handle = async {
            let mut stderr = String::new();
            if let Some(mut err) = child.stderr.take() {
                err.read_to_string(&mut stderr).await?;
            }
            Ok::<_, std::io::Error>(stderr)
        };

        let (stdout_result, stderr_result) = tokio::join!(stdout_handle, stderr_handle);
        let stdout = stdout_result?;
        let stderr = stderr_result?;

        let status = child.wait().await?;

        Ok::<_, std::io::Error>(CommandOutput {
            stdout,
            stderr,
            exit_code: status.code().unwrap_or(-1),
        })
    })
    .await;

    let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    let outcome = match result {
        Ok(Ok(output)) => output.into_query_result(),
        Ok(Err(e)) => QueryResult::failed(format!("failed to read output of {program}: {e}")),
        Err(_) => {
            let _ = child.kill().await;
            let _ = child.wait().await;
            QueryResult::failed(format!(
                "timed out after {}s",
                timeout_duration.as_secs()
            ))
        }
    };

    if outcome.success {
        tracing::info!(provider = %provider, duration_ms, "Provider query succeeded");
    } else {
        tracing::warn!(
            provider = %provider,
            duration_ms,
            error = outcome.error.as_deref().unwrap_or_default(),
            "Provider query failed"
        );
    }
    Some(outcome)
}

/// Result of one fan-out: per-provider outcomes plus the derived fact.
#[derive(Debug, Clone, Default)]
pub struct FetchedQuotas {
    pub outcomes: Vec<(Provider, Option<QueryResult>)>,
    pub derived: Option<DerivedUsage>,
}

/// Query every provider in the store and fetch derived usage, all concurrently.
pub async fn fetch_all(store: &CredentialStore) -> FetchedQuotas {
    let queries = Provider::ALL.iter().map(|&provider| async move {
        let outcome = match store.get(provider) {
            Some(credential) => query_provider(provider, credential).await,
            None => None,
        };
        (provider, outcome)
    });

    let derived = async {
        let provider = Provider::ALL
            .iter()
            .copied()
            .find(|p| p.has_derived_usage())?;
        fetch_derived_usage(store.get(provider)?).await
    };

    let (outcomes, derived) = tokio::join!(futures::future::join_all(queries), derived);
    FetchedQuotas { outcomes, derived }
}

/// Partition outcomes and normalize successful reports.
///
/// Absent outcomes and failures that only say the provider's local config
/// is missing are dropped. Successes with an empty report are kept as a
/// section with no body.
#[must_use]
pub fn build_frame(
    outcomes: Vec<(Provider, Option<QueryResult>)>,
    derived: Option<DerivedUsage>,
    generated_at: DateTime<Local>,
) -> Frame {
    let mut reports = Vec::new();
    let mut failures = Vec::new();

    for (provider, outcome) in outcomes {
        let Some(result) = outcome else {
            continue;
        };

        if result.success {
            let raw = result.output.unwrap_or_default();
            let derived = derived.filter(|_| provider.has_derived_usage());
            reports.push(normalize_report(provider, &raw, derived.as_ref()));
            continue;
        }

        match result.error {
            Some(message) if is_ignorable_failure(&message) => {
                tracing::debug!(provider = %provider, "Dropping unconfigured provider");
            }
            Some(message) if !message.trim().is_empty() => {
                failures.push(ProviderFailure { provider, message });
            }
            _ => {
                tracing::debug!(provider = %provider, "Dropping failure without message");
            }
        }
    }

    Frame {
        reports,
        failures,
        generated_at,
    }
}
