//! Dashboard presentation: line colouring, health summary and frame assembly.
//!
//! Colouring is driven by an ordered rule table; the first rule whose
//! pattern matches a line decides its treatment. Every line leaving
//! [`Presenter::assemble`] is fitted to the render width.

use std::fmt::Write as _;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use super::ansi::visible_width;
use super::layout::{center, fit, rule};
use super::palette::Palette;
use crate::core::models::{Frame, ProviderReport, Region, RenderConfig};
use crate::normalize::{BAR_EMPTY, BAR_FILLED, RESET_LINE, USED_LINE};
use crate::util::time::{format_clock, format_countdown, format_timestamp};

/// Dashboard title.
pub const TITLE: &str = "AI Quota Dashboard";

/// Glyph appended to critical bars and used for warnings.
pub const WARNING_GLYPH: &str = "⚠";

/// Percentages at or above this are healthy.
pub const HEALTHY_THRESHOLD: u8 = 70;

/// Percentages at or above this (and below healthy) are moderate.
pub const MODERATE_THRESHOLD: u8 = 40;

// =============================================================================
// Health
// =============================================================================

/// Health tier of a report or bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Health {
    /// 70% and above.
    Healthy,
    /// 40% to 69%.
    Moderate,
    /// Below 40%.
    Critical,
    /// No percentage found.
    Unknown,
}

impl Health {
    /// Classify a percentage.
    #[must_use]
    pub const fn from_percent(percent: Option<u8>) -> Self {
        match percent {
            None => Self::Unknown,
            Some(p) if p >= HEALTHY_THRESHOLD => Self::Healthy,
            Some(p) if p >= MODERATE_THRESHOLD => Self::Moderate,
            Some(_) => Self::Critical,
        }
    }
}

static PERCENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)(?:\.\d+)?%").expect("valid percent regex"));

/// Lowest percentage mentioned anywhere in a report.
///
/// Decimals count by their integer part; values above 100 are capped.
#[must_use]
pub fn summarize(report: &str) -> Option<u8> {
    PERCENT
        .captures_iter(report)
        .filter_map(|caps| caps[1].parse::<u64>().ok())
        .min()
        .map(|p| u8::try_from(p.min(100)).unwrap_or(100))
}

// =============================================================================
// Line classification
// =============================================================================

/// Semantic class of a report line, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    AccountHeader,
    QuotaHeader,
    Bar,
    Used,
    Reset,
    Warning,
    Generic,
}

static ACCOUNT_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:account|账户|账号|用户)\s*[:：]").expect("valid account regex")
});

static QUOTA_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*[^%:：]*(?:quota|limit|限额|配额|额度)[^%:：]*[:：]\s*$")
        .expect("valid quota-header regex")
});

static BAR_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<lead>[^█░]*)(?P<bar>[█░]{2,})(?P<rest>.*)$").expect("valid bar regex")
});

static WARNING_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:⚠|^\s*warning\b|警告)").expect("valid warning regex")
});

/// Ordered `(kind, pattern)` table; first match wins.
static LINE_RULES: LazyLock<Vec<(LineKind, &'static Regex)>> = LazyLock::new(|| {
    vec![
        (LineKind::AccountHeader, &*ACCOUNT_HEADER),
        (LineKind::QuotaHeader, &*QUOTA_HEADER),
        (LineKind::Bar, &*BAR_LINE),
        (LineKind::Used, &*USED_LINE),
        (LineKind::Reset, &*RESET_LINE),
        (LineKind::Warning, &*WARNING_LINE),
    ]
});

/// Classify one line.
#[must_use]
pub fn classify(line: &str) -> LineKind {
    if line.trim().is_empty() {
        return LineKind::Generic;
    }
    LINE_RULES
        .iter()
        .find(|(_, pattern)| pattern.is_match(line))
        .map_or(LineKind::Generic, |(kind, _)| *kind)
}

// =============================================================================
// Presenter
// =============================================================================

/// Watch-mode details shown in the header and footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchInfo {
    /// Polling interval.
    pub interval: Duration,
    /// Time left until the next fetch.
    pub remaining: Duration,
}

/// Turns normalized frames into width-fitted, coloured dashboard lines.
#[derive(Debug, Clone)]
pub struct Presenter {
    palette: Palette,
}

impl Presenter {
    /// Create a presenter using `palette`.
    #[must_use]
    pub const fn new(palette: Palette) -> Self {
        Self { palette }
    }

    fn tier_style(&self, health: Health) -> &rich_rust::Style {
        match health {
            Health::Healthy => &self.palette.healthy,
            Health::Moderate => &self.palette.moderate,
            Health::Critical => &self.palette.critical,
            Health::Unknown => &self.palette.muted,
        }
    }

    /// Colour one normalized report line.
    #[must_use]
    pub fn colorize(&self, line: &str) -> String {
        let p = &self.palette;
        match classify(line) {
            LineKind::AccountHeader => p.paint(&p.account, line),
            LineKind::QuotaHeader => p.paint(&p.quota_header, line),
            LineKind::Bar => self.colorize_bar(line),
            LineKind::Used => p.paint(&p.used, line),
            LineKind::Reset => p.paint(&p.reset, line),
            LineKind::Warning => p.paint(&p.warning, line),
            LineKind::Generic => line.to_string(),
        }
    }

    fn colorize_bar(&self, line: &str) -> String {
        let Some(caps) = BAR_LINE.captures(line) else {
            return line.to_string();
        };
        let bar = &caps["bar"];
        let rest = &caps["rest"];

        let filled = bar.chars().filter(|&c| c == BAR_FILLED).count();
        let empty = bar.chars().filter(|&c| c == BAR_EMPTY).count();
        let percent = summarize(rest).or_else(|| {
            let cells = filled + empty;
            u8::try_from(filled * 100 / cells.max(1)).ok()
        });
        let health = Health::from_percent(percent);
        let tier = self.tier_style(health);
        let p = &self.palette;

        let mut out = String::with_capacity(line.len() + 32);
        out.push_str(&caps["lead"]);
        out.push_str(&p.paint(tier, &BAR_FILLED.to_string().repeat(filled)));
        out.push_str(&p.paint(&p.bar_empty, &BAR_EMPTY.to_string().repeat(empty)));
        out.push_str(&p.paint(tier, rest));
        if health == Health::Critical {
            out.push(' ');
            out.push_str(&p.paint(&p.warning, WARNING_GLYPH));
        }
        out
    }

    /// One summary status line for a report.
    #[must_use]
    pub fn status_line(&self, report: &ProviderReport) -> String {
        let percent = summarize(&report.text());
        let health = Health::from_percent(percent);
        let p = &self.palette;
        let provider = report.provider;

        let marker = match health {
            Health::Unknown => p.paint(&p.muted, "○"),
            _ => p.paint(self.tier_style(health), "●"),
        };
        let mut line = format!("  {marker} {} {}", provider.icon(), provider.display_name());
        if let Some(percent) = percent {
            let _ = write!(line, " ({})", p.paint(self.tier_style(health), &format!("{percent}%")));
        }
        line
    }

    /// Footer countdown line, redrawn every second in watch mode.
    #[must_use]
    pub fn countdown_line(&self, remaining: Duration, width: usize) -> String {
        let p = &self.palette;
        let text = format!(
            "Next update in {} · Press Ctrl+C to exit",
            format_countdown(remaining)
        );
        fit(&p.paint(&p.muted, &text), width)
    }

    fn section_banner(&self, report: &ProviderReport, width: usize) -> String {
        let p = &self.palette;
        let provider = report.provider;
        let title = p.paint(
            &p.section,
            &format!("{} {}", provider.icon(), provider.display_name()),
        );
        let lead = format!("── {title} ");
        let fill = width.saturating_sub(visible_width(&lead));
        fit(&format!("{lead}{}", p.paint(&p.muted, &rule('─', fill))), width)
    }

    /// Assemble a full frame.
    ///
    /// Regions follow `config`; the error block renders whenever a provider
    /// failed. `watch` adds the banner and live countdown.
    #[must_use]
    pub fn assemble(
        &self,
        frame: &Frame,
        config: &RenderConfig,
        watch: Option<&WatchInfo>,
        width: usize,
    ) -> Vec<String> {
        let p = &self.palette;
        let mut lines: Vec<String> = Vec::new();

        if config.shows(Region::Header) {
            lines.push(p.paint(&p.muted, &rule('═', width)));
            lines.push(center(&p.paint(&p.title, TITLE), width));
            lines.push(center(&format_timestamp(frame.generated_at), width));
            if let Some(watch) = watch {
                let minutes = watch.interval.as_secs() / 60;
                let banner = if minutes > 0 {
                    format!("Watch mode · refreshing every {minutes} min")
                } else {
                    format!("Watch mode · refreshing every {}s", watch.interval.as_secs())
                };
                lines.push(center(&p.paint(&p.muted, &banner), width));
            }
            lines.push(p.paint(&p.muted, &rule('═', width)));
            lines.push(String::new());
        }

        if config.shows(Region::Summary) {
            lines.push(p.paint(
                &p.title,
                &format!("Active providers: {}", frame.reports.len()),
            ));
            lines.extend(frame.reports.iter().map(|report| self.status_line(report)));
            lines.push(String::new());
        }

        if config.shows(Region::AccountQuota) {
            for report in &frame.reports {
                lines.push(self.section_banner(report, width));
                lines.extend(report.lines.iter().map(|line| self.colorize(line)));
                lines.push(String::new());
            }
        }

        if !frame.failures.is_empty() {
            lines.push(p.paint(&p.error, "Errors:"));
            for failure in &frame.failures {
                let message = failure.message.lines().next().unwrap_or_default().trim();
                lines.push(format!(
                    "  {} {}: {message}",
                    p.paint(&p.error, "✗"),
                    failure.provider.display_name()
                ));
            }
            lines.push(String::new());
        }

        if config.shows(Region::Footer) {
            lines.push(p.paint(&p.muted, &rule('─', width)));
            lines.push(p.paint(
                &p.muted,
                &format!("Last updated: {}", format_clock(frame.generated_at)),
            ));
            if let Some(watch) = watch {
                lines.push(self.countdown_line(watch.remaining, width));
            }
        }

        while lines.last().is_some_and(String::is_empty) {
            lines.pop();
        }

        lines.into_iter().map(|line| fit(&line, width)).collect()
    }

    /// Hint printed when no provider is configured.
    #[must_use]
    pub fn empty_hint(&self, credentials_path: &str) -> Vec<String> {
        let p = &self.palette;
        vec![
            p.paint(&p.warning, "No quota providers configured."),
            format!("Add provider entries to {credentials_path}"),
            p.paint(&p.muted, "Run with --help for all options."),
        ]
    }

    /// Line printed when watch mode is interrupted.
    #[must_use]
    pub fn farewell_line(&self) -> String {
        let p = &self.palette;
        p.paint(&p.muted, "Stopped watching quotas. Goodbye!")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{ProviderFailure, ProviderReport};
    use crate::core::provider::Provider;
    use crate::normalize::{BAR_WIDTH, draw_bar};
    use crate::render::ansi::strip;
    use chrono::{Local, TimeZone};

    fn report(provider: Provider, lines: &[&str]) -> ProviderReport {
        ProviderReport {
            provider,
            lines: lines.iter().map(|l| (*l).to_string()).collect(),
        }
    }

    fn frame(reports: Vec<ProviderReport>, failures: Vec<ProviderFailure>) -> Frame {
        Frame {
            reports,
            failures,
            generated_at: Local.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn summarize_takes_lowest_percentage() {
        assert_eq!(summarize("Session 72%\nWeekly 45%"), Some(45));
        assert_eq!(
            Health::from_percent(summarize("Session 72%\nWeekly 45%")),
            Health::Moderate
        );
    }

    #[test]
    fn summarize_without_markers_is_unknown() {
        assert_eq!(summarize("Used: 10/100"), None);
        assert_eq!(Health::from_percent(None), Health::Unknown);
    }

    #[test]
    fn summarize_counts_decimal_by_integer_part() {
        assert_eq!(summarize("12.5% left, 80% other"), Some(12));
    }

    #[test]
    fn health_tier_boundaries() {
        assert_eq!(Health::from_percent(Some(70)), Health::Healthy);
        assert_eq!(Health::from_percent(Some(69)), Health::Moderate);
        assert_eq!(Health::from_percent(Some(40)), Health::Moderate);
        assert_eq!(Health::from_percent(Some(39)), Health::Critical);
    }

    #[test]
    fn classify_in_priority_order() {
        assert_eq!(classify("Account: dev@example.com"), LineKind::AccountHeader);
        assert_eq!(classify("Token limit (5 hours):"), LineKind::QuotaHeader);
        assert_eq!(classify("Monthly quota:"), LineKind::QuotaHeader);
        assert_eq!(classify("  ██████░░░░ 60%"), LineKind::Bar);
        assert_eq!(classify("  Used: 3 / 10 • Resets in 2h"), LineKind::Used);
        assert_eq!(classify("Quota resets at 00:00 UTC"), LineKind::Reset);
        assert_eq!(classify("⚠ Approaching limit"), LineKind::Warning);
        assert_eq!(classify("Plan: Pro"), LineKind::Generic);
        assert_eq!(classify(""), LineKind::Generic);
    }

    #[test]
    fn plain_colorize_is_identity() {
        let presenter = Presenter::new(Palette::plain());
        for line in ["Account: x", "  Used: 1 / 2", "  ████░░ 80%", "misc"] {
            assert_eq!(presenter.colorize(line), line);
        }
    }

    #[test]
    fn critical_bar_gets_warning_glyph() {
        let presenter = Presenter::new(Palette::plain());
        let line = format!("  {} 20%", draw_bar(20.0, BAR_WIDTH));
        assert_eq!(presenter.colorize(&line), format!("{line} {WARNING_GLYPH}"));
    }

    #[test]
    fn colored_bar_keeps_visible_text() {
        let presenter = Presenter::new(Palette::new(true));
        let line = format!("  {} 55%", draw_bar(55.0, BAR_WIDTH));
        let colored = presenter.colorize(&line);
        assert!(colored.contains('\x1b'));
        assert_eq!(strip(&colored), line);
    }

    #[test]
    fn bar_without_percent_uses_fill_ratio() {
        let presenter = Presenter::new(Palette::plain());
        let line = format!("  {}", draw_bar(10.0, BAR_WIDTH));
        assert!(presenter.colorize(&line).ends_with(WARNING_GLYPH));
        let full = format!("  {}", draw_bar(100.0, BAR_WIDTH));
        assert_eq!(presenter.colorize(&full), full);
    }

    #[test]
    fn status_line_shows_minimum_percentage() {
        let presenter = Presenter::new(Palette::plain());
        let line = presenter.status_line(&report(Provider::Claude, &["Session 72%", "Weekly 45%"]));
        assert_eq!(line, "  ● ◆ Claude (45%)");
    }

    #[test]
    fn status_line_unknown_health_has_no_parenthetical() {
        let presenter = Presenter::new(Palette::plain());
        let line = presenter.status_line(&report(Provider::Kimi, &["Used: 10/100"]));
        assert_eq!(line, "  ○ ◐ Kimi");
    }

    #[test]
    fn assemble_emits_all_regions() {
        let presenter = Presenter::new(Palette::plain());
        let frame = frame(
            vec![report(Provider::Claude, &["Account: x", "Used: 10/100"])],
            vec![ProviderFailure {
                provider: Provider::Codex,
                message: "HTTP 401 Unauthorized\nbody".to_string(),
            }],
        );
        let lines = presenter.assemble(&frame, &RenderConfig::default(), None, 60);
        let text = lines.join("\n");
        assert!(text.contains(TITLE));
        assert!(text.contains("2026-10-16 12:00:00"));
        assert!(text.contains("Active providers: 1"));
        assert!(text.contains("── ◆ Claude "));
        assert!(text.contains("Errors:"));
        assert!(text.contains("  ✗ Codex: HTTP 401 Unauthorized"));
        assert!(!text.contains("body"));
        assert!(text.contains("Last updated: 12:00:00"));
        assert!(!text.contains("Next update"));
    }

    #[test]
    fn assemble_watch_mode_adds_banner_and_countdown() {
        let presenter = Presenter::new(Palette::plain());
        let frame = frame(vec![report(Provider::Glm, &["Used: 1/2"])], vec![]);
        let watch = WatchInfo {
            interval: Duration::from_secs(300),
            remaining: Duration::from_secs(299),
        };
        let lines = presenter.assemble(&frame, &RenderConfig::default(), Some(&watch), 80);
        assert!(lines.iter().any(|l| l.contains("refreshing every 5 min")));
        assert_eq!(
            lines.last().map(String::as_str),
            Some("Next update in 4m 59s · Press Ctrl+C to exit")
        );
    }

    #[test]
    fn assemble_respects_region_flags() {
        let presenter = Presenter::new(Palette::plain());
        let frame = frame(vec![report(Provider::Claude, &["Used: 1/2"])], vec![]);
        let config = RenderConfig::from_show_list("dashboard", None).unwrap();
        let lines = presenter.assemble(&frame, &config, None, 40);
        assert!(lines[0].starts_with("── ◆ Claude"));
        assert_eq!(lines.len(), 2);
        assert!(!lines.iter().any(|l| l.contains(TITLE)));
    }

    #[test]
    fn assemble_fits_every_line() {
        let presenter = Presenter::new(Palette::new(true));
        let long = "Account: a-very-long-account-identifier@an-even-longer-domain.example.com";
        let frame = frame(
            vec![report(
                Provider::Gemini,
                &[long, &format!("  {} 33%", draw_bar(33.0, BAR_WIDTH))],
            )],
            vec![],
        );
        for width in [20, 33, 50] {
            for line in presenter.assemble(&frame, &RenderConfig::default(), None, width) {
                assert!(visible_width(&line) <= width, "{width}: {line:?}");
            }
        }
    }
}
