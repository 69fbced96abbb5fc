//! Quota report normalization.
//!
//! Providers emit loosely structured, sometimes bilingual, free text. Each
//! transform here is a total `text -> text` function that leaves input it
//! does not recognise untouched, so normalization can never fail. A
//! provider's pipeline is the ordered list returned by
//! [`Provider::transforms`], followed by [`tidy_blank_lines`].

mod derived;
mod quota_lines;
mod reset;

use std::sync::LazyLock;

use regex::Regex;

pub use derived::inject_derived_usage;
pub use quota_lines::{BAR_EMPTY, BAR_FILLED, BAR_WIDTH, draw_bar, rerender_quota_lines};
pub use reset::inline_reset_lines;

use crate::core::models::{DerivedUsage, ProviderReport};
use crate::core::provider::Provider;

/// Separator between a used line and its inlined reset countdown.
pub const RESET_SEPARATOR: &str = " • ";

/// `Used: ...` line in English or Chinese, capturing indent, label, separator and value.
pub(crate) static USED_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<indent>\s*)(?P<label>(?i:used)|已使用|已用)\s*(?P<sep>[:：])\s*(?P<value>.*)$")
        .expect("valid used-line regex")
});

/// A reset countdown anywhere in a line.
pub(crate) static RESET_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\bresets?\s+in\b|\bquota\s+resets\b|重置)").expect("valid reset regex")
});

/// A line that starts with a reset countdown.
pub(crate) static RESET_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:resets?\s+in\b|quota\s+resets\b|(?:额度|配额)?重置)")
        .expect("valid reset-line regex")
});

/// One step of a provider's normalization pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Merge the derived used/total fact into the token limit section.
    InjectDerivedUsage,
    /// Attach stand-alone reset lines to the preceding used line.
    InlineResetLines,
    /// Redraw `<label> <bar> <pct>% (<used>/<total>)` lines as canonical blocks.
    RerenderQuotaLines,
}

impl Transform {
    /// Apply this transform.
    #[must_use]
    pub fn apply(self, text: &str, derived: Option<&DerivedUsage>) -> String {
        match self {
            Self::InjectDerivedUsage => inject_derived_usage(text, derived),
            Self::InlineResetLines => inline_reset_lines(text),
            Self::RerenderQuotaLines => rerender_quota_lines(text),
        }
    }
}

/// Run a provider's full pipeline over its raw report.
#[must_use]
pub fn normalize_report(
    provider: Provider,
    raw: &str,
    derived: Option<&DerivedUsage>,
) -> ProviderReport {
    let text = provider
        .transforms()
        .iter()
        .fold(raw.replace("\r\n", "\n"), |text, transform| {
            transform.apply(&text, derived)
        });
    let lines = tidy_blank_lines(&text)
        .split('\n')
        .map(str::to_string)
        .collect::<Vec<_>>();

    tracing::debug!(
        provider = provider.cli_name(),
        lines = lines.len(),
        derived = derived.is_some(),
        "Normalized report"
    );

    ProviderReport {
        provider,
        lines: if lines.len() == 1 && lines[0].is_empty() {
            Vec::new()
        } else {
            lines
        },
    }
}

/// Collapse runs of blank lines to one, drop leading and trailing blanks,
/// and strip trailing whitespace from every line.
#[must_use]
pub fn tidy_blank_lines(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for line in text.lines().map(str::trim_end) {
        let blank = line.is_empty();
        if blank && out.last().is_none_or(|prev| prev.is_empty()) {
            continue;
        }
        out.push(line);
    }
    while out.last().is_some_and(|line| line.is_empty()) {
        out.pop();
    }
    out.join("\n")
}
