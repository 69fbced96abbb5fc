//! Width-safe line layout.
//!
//! The render width is recomputed every frame so the dashboard follows
//! terminal resizes between polls.

use super::ansi::{truncate, visible_width};
use crate::core::models::MIN_RENDER_WIDTH;

/// Width used when the terminal size cannot be determined.
pub const FALLBACK_WIDTH: u16 = 80;

/// Live terminal column count.
///
/// Falls back to `COLUMNS`, then [`FALLBACK_WIDTH`], when stdout is not a terminal.
#[must_use]
pub fn terminal_width() -> u16 {
    match crossterm::terminal::size() {
        Ok((cols, _)) if cols > 0 => cols,
        _ => std::env::var("COLUMNS")
            .ok()
            .and_then(|value| value.trim().parse::<u16>().ok())
            .filter(|cols| *cols > 0)
            .unwrap_or(FALLBACK_WIDTH),
    }
}

/// Effective column budget for a frame.
///
/// A configured cap narrows the dashboard but never below
/// `min(20, terminal_width)` and never beyond the terminal itself.
#[must_use]
pub fn render_width(max_width: Option<u16>, terminal_width: u16) -> usize {
    let terminal = usize::from(terminal_width);
    match max_width {
        None => terminal,
        Some(cap) => {
            let floor = usize::from(MIN_RENDER_WIDTH).min(terminal);
            usize::from(cap).clamp(floor, terminal)
        }
    }
}

/// Center `text` in exactly `width` visible columns.
///
/// Over-long text is truncated with an ellipsis first; when `width <= 3`
/// it is replaced by `width` periods.
#[must_use]
pub fn center(text: &str, width: usize) -> String {
    let fitted = if visible_width(text) > width {
        if width <= 3 {
            return ".".repeat(width);
        }
        truncate(text, width)
    } else {
        text.to_string()
    };

    let slack = width.saturating_sub(visible_width(&fitted));
    let left = slack / 2;
    let right = slack - left;
    format!("{}{fitted}{}", " ".repeat(left), " ".repeat(right))
}

/// Fit a line to `width` columns without padding.
#[must_use]
pub fn fit(text: &str, width: usize) -> String {
    truncate(text, width)
}

/// Horizontal rule spanning `width` columns.
#[must_use]
pub fn rule(ch: char, width: usize) -> String {
    std::iter::repeat_n(ch, width).collect()
}
