//! Time formatting utilities.

use std::time::Duration;

use chrono::{DateTime, Local};

/// Format the time left until the next refresh, e.g. `4m 05s`.
#[must_use]
pub fn format_countdown(remaining: Duration) -> String {
    let total = remaining.as_secs();
    if total == 0 {
        return "now".to_string();
    }

    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{hours}h {minutes:02}m")
    } else if minutes > 0 {
        format!("{minutes}m {seconds:02}s")
    } else {
        format!("{seconds}s")
    }
}

/// Full timestamp for the dashboard header.
#[must_use]
pub fn format_timestamp(at: DateTime<Local>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Wall-clock time for the footer.
#[must_use]
pub fn format_clock(at: DateTime<Local>) -> String {
    at.format("%H:%M:%S").to_string()
}
