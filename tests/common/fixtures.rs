//! Test fixtures for integration tests.
//!
//! Credential stores point providers at `sh -c` scripts that print canned
//! reports, so the full binary runs without any real provider installed.

#![allow(dead_code)]

use std::path::PathBuf;

use assert_cmd::Command;

use quotaboard::test_utils::{TestDir, make_test_credentials_json};

/// Raw GLM report whose token limit section has no usable numbers yet.
pub const GLM_PLACEHOLDER_REPORT: &str = "Account: glm-dev\n\nToken limit (5 hours):\n  Progress: 42%\n  Used: NaN / N/A\n  Resets in 3h 12m\n\nMonthly quota:\n  Used: 120 / 500\n";

/// Raw Gemini report with per-model quota lines.
pub const GEMINI_REPORT: &str = "Account: gem@example.com\nGemini quota\nPro ██████░░░░ 62% (186/300)\nFlash ████░░░░░░ 40% (120/300)\nResets in 5h 12m (2026-10-17 00:00 UTC)\n";

/// Shell script printing `text` verbatim.
#[must_use]
pub fn print_script(text: &str) -> String {
    format!("cat <<'REPORT'\n{text}\nREPORT")
}

/// Temporary config directory with a credential store.
pub struct Workspace {
    pub dir: TestDir,
    pub credentials: PathBuf,
}

impl Workspace {
    /// Workspace whose store maps each provider to a script.
    #[must_use]
    pub fn with_scripts(entries: &[(&str, &str)]) -> Self {
        Self::with_store(&make_test_credentials_json(entries))
    }

    /// Workspace with raw credential store JSON.
    #[must_use]
    pub fn with_store(json: &str) -> Self {
        let dir = TestDir::new();
        let credentials = dir.create_file("credentials.json", json);
        Self { dir, credentials }
    }

    /// Workspace without a credential store.
    #[must_use]
    pub fn empty() -> Self {
        let dir = TestDir::new();
        let credentials = dir.file_path("credentials.json");
        Self { dir, credentials }
    }

    /// The binary, isolated from the caller's environment and config.
    #[must_use]
    #[allow(deprecated)]
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("quotaboard").expect("binary built");
        cmd.env_clear()
            .env("PATH", std::env::var_os("PATH").unwrap_or_default())
            .env("NO_COLOR", "1")
            .env("COLUMNS", "100")
            .env("QUOTABOARD_CONFIG", self.dir.file_path("config.toml"))
            .arg("--credentials")
            .arg(&self.credentials);
        cmd
    }
}
