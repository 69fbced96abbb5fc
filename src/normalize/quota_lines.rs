//! Re-rendering per-category quota lines into canonical blocks.
//!
//! Input lines look like `Premium requests ███░░░ 62% (186/300)` or
//! `Chat messages Unlimited`, with a reset line somewhere in the report.
//! Each becomes a label line, a freshly drawn bar and a used/total line.

use std::sync::LazyLock;

use regex::Regex;

use super::{RESET_LINE, RESET_SEPARATOR, tidy_blank_lines};

/// Cells in a drawn bar.
pub const BAR_WIDTH: usize = 30;
/// Glyph for a filled cell.
pub const BAR_FILLED: char = '█';
/// Glyph for an empty cell.
pub const BAR_EMPTY: char = '░';

static QUOTA_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?P<label>.*?\S)\s+[█▓▒░■□#=\-]+\s*(?P<pct>\d+(?:\.\d+)?)%\s*\(\s*(?P<used>[^/()]*?)\s*/\s*(?P<total>[^/()]*?)\s*\)\s*$",
    )
    .expect("valid quota-line regex")
});

static UNLIMITED_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?P<label>[^:：]*?[^\s:：])\s+unlimited\s*$")
        .expect("valid unlimited regex")
});

/// Draw a proportional bar: `round(clamp(percent, 0, 100) / 100 * width)` filled cells.
#[must_use]
pub fn draw_bar(percent: f64, width: usize) -> String {
    let pct = if percent.is_nan() {
        0.0
    } else {
        percent.clamp(0.0, 100.0)
    };
    #[allow(clippy::cast_precision_loss)] // width is small
    let width_f = width as f64;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // pct is 0-100
    let filled = ((pct / 100.0) * width_f).round() as usize;
    let filled = filled.min(width);
    let empty = width - filled;

    let mut bar = String::with_capacity(width * BAR_FILLED.len_utf8());
    bar.extend(std::iter::repeat_n(BAR_FILLED, filled));
    bar.extend(std::iter::repeat_n(BAR_EMPTY, empty));
    bar
}

enum QuotaEntry {
    Metered {
        label: String,
        percent: String,
        used: String,
        total: String,
    },
    Unlimited {
        label: String,
    },
}

fn parse_entry(line: &str) -> Option<QuotaEntry> {
    if let Some(caps) = QUOTA_LINE.captures(line) {
        return Some(QuotaEntry::Metered {
            label: caps["label"].to_string(),
            percent: caps["pct"].to_string(),
            used: caps["used"].to_string(),
            total: caps["total"].to_string(),
        });
    }
    UNLIMITED_LINE.captures(line).map(|caps| QuotaEntry::Unlimited {
        label: caps["label"].to_string(),
    })
}

/// Countdown text of a reset line, without any parenthesized absolute date.
fn reset_countdown(line: &str) -> String {
    line.split('(').next().unwrap_or_default().trim().to_string()
}

fn push_block(out: &mut Vec<String>, entry: QuotaEntry, reset: Option<&str>) {
    let suffix = reset.map(|r| format!("{RESET_SEPARATOR}{r}")).unwrap_or_default();
    match entry {
        QuotaEntry::Metered {
            label,
            percent,
            used,
            total,
        } => {
            let value = percent.parse::<f64>().unwrap_or(0.0);
            out.push(label);
            out.push(format!("  {} {percent}%", draw_bar(value, BAR_WIDTH)));
            out.push(format!("  Used: {used} / {total}{suffix}"));
        }
        QuotaEntry::Unlimited { label } => {
            out.push(label);
            out.push(format!("  {}", draw_bar(100.0, BAR_WIDTH)));
            out.push(format!("  Unlimited{suffix}"));
        }
    }
}

/// Rewrite every quota line as a three-line block.
///
/// The first reset line is pulled out of the stream and its countdown is
/// appended to the first block's used line. Consecutive blocks are
/// separated by a blank line; other lines pass through. Blank runs are
/// collapsed and trailing blanks removed, also for text without any
/// quota lines. A `key: Unlimited` line is a field, not a quota entry.
#[must_use]
pub fn rerender_quota_lines(text: &str) -> String {
    let mut lines: Vec<&str> = text.split('\n').collect();
    if !lines.iter().any(|line| parse_entry(line).is_some()) {
        return tidy_blank_lines(text);
    }

    let reset_index = lines.iter().position(|line| RESET_LINE.is_match(line));
    let mut reset = reset_index
        .map(|index| reset_countdown(lines.remove(index)))
        .filter(|countdown| !countdown.is_empty());

    let mut out: Vec<String> = Vec::with_capacity(lines.len() * 3);
    let mut previous_was_block = false;

    for line in lines {
        match parse_entry(line) {
            Some(entry) => {
                if previous_was_block {
                    out.push(String::new());
                }
                push_block(&mut out, entry, reset.take().as_deref());
                previous_was_block = true;
            }
            None => {
                out.push(line.to_string());
                previous_was_block = false;
            }
        }
    }

    tidy_blank_lines(&out.join("\n"))
}
