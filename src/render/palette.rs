//! Dashboard colour palette built on `rich_rust` styles.
//!
//! A disabled palette returns text untouched, so plain output (piped,
//! `NO_COLOR`, `--no-color`) never carries escape codes.

use rich_rust::{Color, ColorSystem, Style};

/// Parse color from name with fallback.
#[must_use]
pub fn parse_color(name: &str) -> Color {
    Color::parse(name).unwrap_or_else(|_| Color::parse("white").unwrap())
}

/// Styles for every semantic line class.
#[derive(Debug, Clone)]
pub struct Palette {
    enabled: bool,
    /// Dashboard title.
    pub title: Style,
    /// Section banner titles.
    pub section: Style,
    /// `Account:` lines.
    pub account: Style,
    /// Quota and limit headers.
    pub quota_header: Style,
    /// Bars and percentages at 70% and above.
    pub healthy: Style,
    /// Bars and percentages from 40% to 69%.
    pub moderate: Style,
    /// Bars and percentages below 40%.
    pub critical: Style,
    /// Empty bar cells.
    pub bar_empty: Style,
    /// `Used:` lines.
    pub used: Style,
    /// Reset countdown lines.
    pub reset: Style,
    /// Warning markers.
    pub warning: Style,
    /// Rules, timestamps, hints.
    pub muted: Style,
    /// Error block.
    pub error: Style,
}

impl Palette {
    /// Palette with colours on or off.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            title: Style::new().color(parse_color("cyan")).bold(),
            section: Style::new().color(parse_color("blue")).bold(),
            account: Style::new().color(parse_color("cyan")).bold(),
            quota_header: Style::new().color(parse_color("magenta")).bold(),
            healthy: Style::new().color(parse_color("green")).bold(),
            moderate: Style::new().color(parse_color("yellow")).bold(),
            critical: Style::new().color(parse_color("red")).bold(),
            bar_empty: Style::new().color(parse_color("bright_black")),
            used: Style::new().color(parse_color("white")).bold(),
            reset: Style::new().dim(),
            warning: Style::new().color(parse_color("yellow")).bold(),
            muted: Style::new().dim(),
            error: Style::new().color(parse_color("red")).bold(),
        }
    }

    /// Palette that never emits escape codes.
    #[must_use]
    pub fn plain() -> Self {
        Self::new(false)
    }

    /// Render `text` with `style`.
    #[must_use]
    pub fn paint(&self, style: &Style, text: &str) -> String {
        if !self.enabled || text.is_empty() {
            return text.to_string();
        }
        style.render(text, ColorSystem::Standard)
    }
}
