//! Test utilities for quotaboard.
//!
//! Provides shared helpers, test data factories, and assertion macros
//! for use across all test modules.
//!
//! # Usage
//!
//! ```rust,ignore
//! use quotaboard::test_utils::*;
//!
//! let frame = make_test_frame();
//! let dir = TestDir::new();
//! dir.create_file("credentials.json", &make_test_credentials_json(&[("claude", "echo hi")]));
//! ```

use chrono::{DateTime, Local, TimeZone};
use std::fs;
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

use crate::core::models::{Frame, ProviderFailure, ProviderReport, QueryResult};
use crate::core::provider::Provider;

// =============================================================================
// Test Data Factories
// =============================================================================

/// Fixed timestamp used by frame factories: 2026-10-16 12:00:00 local time.
///
/// # Panics
///
/// Panics if the local timezone cannot represent the timestamp.
#[must_use]
pub fn test_timestamp() -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2026, 10, 16, 12, 0, 0)
        .single()
        .expect("unambiguous test timestamp")
}

/// A successful query whose report is `output`.
#[must_use]
pub fn make_test_query_ok(output: &str) -> QueryResult {
    QueryResult::ok(output)
}

/// A failed query with `error` as its message.
#[must_use]
pub fn make_test_query_failed(error: &str) -> QueryResult {
    QueryResult::failed(error)
}

/// Realistic raw Claude-style report.
#[must_use]
pub fn make_test_raw_report() -> String {
    "Account: dev@example.com\n\nSession limit:\n  ██████████████████████░░░░░░░░ 72%\n  Used: 28 / 100\n  Resets in 2h 10m\n\nWeekly limit:\n  █████████████░░░░░░░░░░░░░░░░░ 45%\n  Used: 55 / 100\n  Resets in 3d 4h\n"
        .to_string()
}

/// Normalized report with the given lines.
#[must_use]
pub fn make_test_report(provider: Provider, lines: &[&str]) -> ProviderReport {
    ProviderReport {
        provider,
        lines: lines.iter().map(|line| (*line).to_string()).collect(),
    }
}

/// Frame with one Claude report and no failures.
#[must_use]
pub fn make_test_frame() -> Frame {
    Frame {
        reports: vec![make_test_report(
            Provider::Claude,
            &["Account: dev@example.com", "Session 72%", "Weekly 45%"],
        )],
        failures: Vec::new(),
        generated_at: test_timestamp(),
    }
}

/// Frame with one report and one visible failure.
#[must_use]
pub fn make_test_frame_with_failure() -> Frame {
    let mut frame = make_test_frame();
    frame.failures.push(ProviderFailure {
        provider: Provider::Codex,
        message: "HTTP 401 Unauthorized".to_string(),
    });
    frame
}

/// Credential store JSON where each provider runs `sh -c <script>`.
#[must_use]
pub fn make_test_credentials_json(entries: &[(&str, &str)]) -> String {
    let map: serde_json::Map<String, serde_json::Value> = entries
        .iter()
        .map(|(provider, script)| {
            (
                (*provider).to_string(),
                serde_json::json!({ "command": ["sh", "-c", script] }),
            )
        })
        .collect();
    serde_json::Value::Object(map).to_string()
}

/// Sample config file contents.
#[must_use]
pub fn make_test_config_toml() -> String {
    "[display]\nshow = [\"header\", \"dashboard\", \"footer\"]\nmax_width = 72\n\n[watch]\ninterval_minutes = 2\n"
        .to_string()
}

// =============================================================================
// Temporary Directory
// =============================================================================

/// Isolated temporary directory, cleaned up on drop.
pub struct TestDir {
    inner: tempfile::TempDir,
}

impl TestDir {
    /// Create a new isolated temporary directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: tempfile::tempdir().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the temporary directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.inner.path()
    }

    /// Create a file in the temporary directory with the given content.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be created or written.
    pub fn create_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.inner.path().join(name);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }

        let mut file = fs::File::create(&path).expect("Failed to create test file");
        file.write_all(content.as_bytes())
            .expect("Failed to write test file");
        path
    }

    /// Get the full path to a file in the temporary directory.
    #[must_use]
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.inner.path().join(name)
    }
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Assertion Macros
// =============================================================================

/// Assert that a string contains a substring.
///
/// ```rust,ignore
/// use quotaboard::assert_contains;
///
/// assert_contains!("Active providers: 2", "providers");
/// ```
#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr) => {
        let haystack = $haystack;
        let needle = $needle;
        assert!(
            haystack.contains(needle),
            "Expected string to contain {:?}\n\nActual string:\n{:?}",
            needle,
            haystack
        );
    };
    ($haystack:expr, $needle:expr, $($arg:tt)*) => {
        let haystack = $haystack;
        let needle = $needle;
        assert!(
            haystack.contains(needle),
            $($arg)*
        );
    };
}

/// Assert that a string does NOT contain a substring.
#[macro_export]
macro_rules! assert_not_contains {
    ($haystack:expr, $needle:expr) => {
        let haystack = $haystack;
        let needle = $needle;
        assert!(
            !haystack.contains(needle),
            "Expected string NOT to contain {:?}\n\nActual string:\n{:?}",
            needle,
            haystack
        );
    };
}

/// Assert that a string does NOT contain ANSI escape codes.
#[macro_export]
macro_rules! assert_no_ansi_codes {
    ($text:expr) => {
        let text = $text;
        assert!(
            !text.contains('\x1b'),
            "Expected string to NOT contain ANSI escape codes.\n\nActual string:\n{:?}",
            text
        );
    };
}

// =============================================================================
// Test Helpers
// =============================================================================

/// Strip ANSI escape codes from a string.
#[must_use]
pub fn strip_ansi_codes(text: &str) -> String {
    crate::render::ansi::strip(text)
}
