//! ANSI-aware text measurement.
//!
//! Styled strings are folded over a token stream of visible characters and
//! SGR escape sequences (`ESC [ ... m`). Escapes have zero width and are never
//! split by truncation.

/// Ellipsis appended by [`truncate`].
pub const ELLIPSIS: &str = "...";

/// SGR reset sequence.
pub const RESET: &str = "\x1b[0m";

const ESC: char = '\x1b';

/// One unit of a styled string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// A character that occupies one column.
    Visible(char),
    /// A complete escape sequence, including `ESC [` and the final `m`.
    Escape(&'a str),
}

/// Iterator over the tokens of a string.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut chars = self.rest.chars();
        let first = chars.next()?;

        if first == ESC && chars.next() == Some('[') {
            // Runs to the terminating `m`; an unterminated sequence swallows the rest.
            let body = &self.rest[2..];
            let end = body.find('m').map_or(self.rest.len(), |idx| idx + 3);
            let (escape, rest) = self.rest.split_at(end);
            self.rest = rest;
            return Some(Token::Escape(escape));
        }

        self.rest = &self.rest[first.len_utf8()..];
        Some(Token::Visible(first))
    }
}

/// Tokenize a styled string.
#[must_use]
pub const fn tokenize(text: &str) -> Tokens<'_> {
    Tokens { rest: text }
}

/// Number of visible characters; escape sequences count as zero.
#[must_use]
pub fn visible_width(text: &str) -> usize {
    tokenize(text)
        .filter(|token| matches!(token, Token::Visible(_)))
        .count()
}

/// Remove every escape sequence.
#[must_use]
pub fn strip(text: &str) -> String {
    tokenize(text)
        .filter_map(|token| match token {
            Token::Visible(c) => Some(c),
            Token::Escape(_) => None,
        })
        .collect()
}

fn is_reset(escape: &str) -> bool {
    matches!(escape, "\x1b[0m" | "\x1b[m")
}

/// Truncate to at most `width` visible characters.
///
/// Text that already fits is returned unchanged. Otherwise `width - 3`
/// visible characters are kept and `...` is appended (or `width` periods
/// when there is no room for a full ellipsis). Escapes met before the cut
/// are copied whole; if the last one left styling open a reset follows the
/// ellipsis.
#[must_use]
pub fn truncate(text: &str, width: usize) -> String {
    if visible_width(text) <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    if width < ELLIPSIS.len() {
        return ".".repeat(width);
    }

    let keep = width - ELLIPSIS.len();
    let mut out = String::with_capacity(text.len().min(width * 4) + RESET.len());
    let mut kept = 0;
    let mut styled = false;

    for token in tokenize(text) {
        match token {
            Token::Escape(escape) => {
                out.push_str(escape);
                styled = !is_reset(escape);
            }
            Token::Visible(c) => {
                if kept == keep {
                    break;
                }
                out.push(c);
                kept += 1;
            }
        }
    }

    out.push_str(ELLIPSIS);
    if styled {
        out.push_str(RESET);
    }
    out
}

/// Pad with trailing spaces to exactly `width` visible columns.
#[must_use]
pub fn pad_right(text: &str, width: usize) -> String {
    let fitted = truncate(text, width);
    let fill = width.saturating_sub(visible_width(&fitted));
    format!("{fitted}{}", " ".repeat(fill))
}
