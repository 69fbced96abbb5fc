//! Merging a derived used/total fact into the token limit section.

use std::sync::LazyLock;

use regex::Regex;

use super::USED_LINE;
use crate::core::models::DerivedUsage;

static TOKEN_LIMIT_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:token\s*(?:usage\s*)?limits?\b|token\s*(?:用量)?限额|令牌限额)")
        .expect("valid token-limit regex")
});

static MONTHLY_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:(?:mcp\s+)?monthly\s+(?:quota|limit)|(?:MCP\s*)?(?:每月|月度)(?:额度|配额))")
        .expect("valid monthly-quota regex")
});

static HAS_CJK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{Han}").expect("valid CJK regex"));

/// A `Used:` value that carries no real number yet.
fn is_placeholder(value: &str) -> bool {
    let lower = value.to_lowercase();
    lower.contains("nan") || lower.contains("n/a") || !value.chars().any(|c| c.is_ascii_digit())
}

struct UsedSlot {
    index: usize,
    indent: String,
    label: String,
    sep: String,
    placeholder: bool,
}

/// Merge `derived` into the report's token limit section.
///
/// The section runs from the token limit header to the first blank line
/// after some content, or to a monthly quota header. An existing numeric
/// `Used:` line is kept; a placeholder such as `Used: NaN / N/A` is
/// overwritten; a missing line is inserted right after the section's first
/// content line. Text without a header, or a call without a derived fact,
/// is returned unchanged.
#[must_use]
pub fn inject_derived_usage(text: &str, derived: Option<&DerivedUsage>) -> String {
    let Some(derived) = derived else {
        return text.to_string();
    };

    let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
    let Some(header) = lines.iter().position(|line| TOKEN_LIMIT_HEADER.is_match(line)) else {
        return text.to_string();
    };

    let mut first_content: Option<usize> = None;
    let mut slot: Option<UsedSlot> = None;

    for (index, line) in lines.iter().enumerate().skip(header + 1) {
        if line.trim().is_empty() {
            if first_content.is_some() {
                break;
            }
            continue;
        }
        if MONTHLY_HEADER.is_match(line) || TOKEN_LIMIT_HEADER.is_match(line) {
            break;
        }
        if let Some(caps) = USED_LINE.captures(line) {
            slot = Some(UsedSlot {
                index,
                indent: caps["indent"].to_string(),
                label: caps["label"].to_string(),
                sep: caps["sep"].to_string(),
                placeholder: is_placeholder(&caps["value"]),
            });
            break;
        }
        first_content.get_or_insert(index);
    }

    match slot {
        Some(slot) if !slot.placeholder => {
            tracing::trace!(line = slot.index, "Keeping existing numeric used line");
        }
        Some(slot) => {
            lines[slot.index] = format!(
                "{}{}{} {} / {}",
                slot.indent, slot.label, slot.sep, derived.used, derived.total
            );
        }
        None => {
            let indent = first_content.map_or_else(
                || "  ".to_string(),
                |index| {
                    let line = &lines[index];
                    line[..line.len() - line.trim_start().len()].to_string()
                },
            );
            let label = if HAS_CJK.is_match(&lines[header]) {
                "已用："
            } else {
                "Used:"
            };
            let insert_at = first_content.map_or(header + 1, |index| index + 1);
            lines.insert(
                insert_at,
                format!("{indent}{label} {} / {}", derived.used, derived.total),
            );
        }
    }

    lines.join("\n")
}
