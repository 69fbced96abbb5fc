//! Collapsing stand-alone reset lines into the preceding used line.

use super::{RESET_LINE, RESET_MARKER, RESET_SEPARATOR, USED_LINE};

/// Append each stand-alone reset line to the `Used:` line above it.
///
/// For every used line without an inline reset marker, blank lines are
/// skipped looking for a reset line; if one follows, it is appended after
/// [`RESET_SEPARATOR`] and removed. The result contains no reset line that
/// could still be attached, so a second pass is a no-op.
#[must_use]
pub fn inline_reset_lines(text: &str) -> String {
    let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();

    let mut index = 0;
    while index < lines.len() {
        if USED_LINE.is_match(&lines[index]) && !RESET_MARKER.is_match(&lines[index]) {
            let candidate = lines
                .iter()
                .enumerate()
                .skip(index + 1)
                .find(|(_, line)| !line.trim().is_empty())
                .map(|(found, _)| found);

            if let Some(found) = candidate {
                let next = &lines[found];
                if RESET_LINE.is_match(next) && !USED_LINE.is_match(next) {
                    let reset = lines.remove(found);
                    let used = lines[index].trim_end().to_string();
                    lines[index] = format!("{used}{RESET_SEPARATOR}{}", reset.trim());
                }
            }
        }
        index += 1;
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_following_reset_line() {
        let text = "Token limit:\n  Used: 10 / 100\n  Resets in 2h 5m\nNext";
        assert_eq!(
            inline_reset_lines(text),
            "Token limit:\n  Used: 10 / 100 • Resets in 2h 5m\nNext"
        );
    }

    #[test]
    fn looks_past_blank_lines() {
        let text = "  Used: 10 / 100\n\n  Quota resets at 00:00 UTC\n";
        assert_eq!(
            inline_reset_lines(text),
            "  Used: 10 / 100 • Quota resets at 00:00 UTC\n\n"
        );
    }

    #[test]
    fn chinese_lines_are_merged() {
        let text = "  已用：3 / 50\n  重置：4 小时后";
        assert_eq!(inline_reset_lines(text), "  已用：3 / 50 • 重置：4 小时后");
    }

    #[test]
    fn leaves_used_line_with_inline_reset() {
        let text = "Used: 1/2 • Resets in 1h\nResets in 5h";
        assert_eq!(inline_reset_lines(text), text);
    }

    #[test]
    fn does_not_reach_across_other_content() {
        let text = "Used: 1/2\nProgress: 50%\nResets in 1h";
        assert_eq!(inline_reset_lines(text), text);
    }

    #[test]
    fn each_used_line_takes_its_own_reset() {
        let text = "Used: 1/2\nResets in 1h\n\nUsed: 5/9\nResets in 7d";
        assert_eq!(
            inline_reset_lines(text),
            "Used: 1/2 • Resets in 1h\n\nUsed: 5/9 • Resets in 7d"
        );
    }

    #[test]
    fn running_twice_equals_running_once() {
        let samples = [
            "Used: 1/2\nResets in 1h\nResets in 2h",
            "Used: 1/2\n\n\nResets in 1h\nUsed: 3/4\n\nQuota resets soon\n",
            "已用：1\n重置：明天\n已用：2",
            "Resets in 1h\nUsed: 9/9",
            "no quota here",
        ];
        for text in samples {
            let once = inline_reset_lines(text);
            assert_eq!(inline_reset_lines(&once), once, "{text:?}");
        }
    }

    #[test]
    fn text_without_used_lines_is_identity() {
        let text = "Account: dev\nResets in 1h\n";
        assert_eq!(inline_reset_lines(text), text);
    }
}
