//! Environment detection utilities.

use std::io::IsTerminal;

/// Check if stdout is a TTY.
#[must_use]
pub fn stdout_is_tty() -> bool {
    std::io::stdout().is_terminal()
}

/// Check if color should be enabled.
#[must_use]
pub fn should_use_color(no_color_flag: bool) -> bool {
    if no_color_flag {
        tracing::debug!(reason = "no_color_flag", "Color disabled");
        return false;
    }

    // Any value, including empty, disables color (https://no-color.org/)
    if std::env::var_os("NO_COLOR").is_some() {
        tracing::debug!(reason = "no_color_env", "Color disabled");
        return false;
    }

    if std::env::var("TERM").is_ok_and(|t| t == "dumb") {
        tracing::debug!(reason = "term_dumb", "Color disabled");
        return false;
    }

    stdout_is_tty()
}

/// Read a non-empty, trimmed environment variable.
#[must_use]
pub fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
