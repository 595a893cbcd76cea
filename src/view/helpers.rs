//! Text measuring helpers shared by the renderers.
//!
//! All positions are terminal columns as reported by `unicode-width`, never
//! bytes, so wide characters are never split.

use super::constants::{ELLIPSIS, WRAP_LOOKBACK};
use std::borrow::Cow;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Drop the first `columns` columns of `text`.
pub fn skip_columns(text: &str, columns: usize) -> &str {
    let mut skipped = 0;
    for (idx, ch) in text.char_indices() {
        if skipped >= columns {
            return &text[idx..];
        }
        skipped += ch.width().unwrap_or(0);
    }
    ""
}

/// The longest prefix of `text` at most `columns` wide.
pub fn take_columns(text: &str, columns: usize) -> &str {
    let mut used = 0;
    for (idx, ch) in text.char_indices() {
        let width = ch.width().unwrap_or(0);
        if used + width > columns {
            return &text[..idx];
        }
        used += width;
    }
    text
}

/// Cut `text` to `max` columns, ending in `...` when anything was cut.
pub fn fit_with_ellipsis(text: &str, max: usize) -> Cow<'_, str> {
    if text.width() <= max {
        Cow::Borrowed(text)
    } else {
        let kept = take_columns(text, max.saturating_sub(ELLIPSIS.len()));
        Cow::Owned(format!("{kept}{ELLIPSIS}"))
    }
}

/// Replace control characters so a value renders on one row.
pub fn single_row(text: &str) -> Cow<'_, str> {
    if text.contains(char::is_control) {
        Cow::Owned(
            text.chars()
                .map(|c| if c.is_control() { ' ' } else { c })
                .collect(),
        )
    } else {
        Cow::Borrowed(text)
    }
}

/// Break `line` into rows at most `width` columns wide.
///
/// A break goes after a space, comma or colon found near the end of the
/// row; otherwise the row is cut at exactly `width`. A width of 0 leaves
/// the line whole.
pub fn wrap_to_width(line: &str, width: usize) -> Vec<String> {
    if width == 0 || line.width() <= width {
        return vec![line.to_string()];
    }

    let mut rows = Vec::new();
    let mut rest = line;
    while rest.width() > width {
        let fit = match take_columns(rest, width) {
            "" => rest.chars().next().map_or(rest.len(), char::len_utf8),
            head => head.len(),
        };
        let cut = preferred_break(&rest[..fit]).unwrap_or(fit);
        rows.push(rest[..cut].to_string());
        rest = &rest[cut..];
    }
    if !rest.is_empty() {
        rows.push(rest.to_string());
    }
    rows
}

/// Byte offset just after the last break character in the tail of `row`.
fn preferred_break(row: &str) -> Option<usize> {
    row.char_indices()
        .rev()
        .take(WRAP_LOOKBACK)
        .filter(|&(idx, _)| idx > 0)
        .find(|&(_, ch)| matches!(ch, ' ' | ',' | ':'))
        .map(|(idx, ch)| idx + ch.len_utf8())
}

/// `1234567` → `1,234,567`.
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn skip_and_take_count_columns_not_bytes() {
        assert_eq!(skip_columns("héllo", 2), "llo");
        assert_eq!(take_columns("héllo", 2), "hé");
        assert_eq!(skip_columns("abc", 10), "");
        assert_eq!(take_columns("abc", 10), "abc");
    }

    #[test]
    fn wide_characters_are_never_split() {
        assert_eq!(take_columns("日本語", 3), "日");
        assert_eq!(skip_columns("日本語", 1), "本語");
    }

    #[test]
    fn ellipsis_only_when_cut() {
        assert_eq!(fit_with_ellipsis("short", 10), "short");
        assert_eq!(fit_with_ellipsis("abcdefghijkl", 8), "abcde...");
    }

    #[test]
    fn control_characters_become_spaces() {
        assert_eq!(single_row("a\nb\tc"), "a b c");
        assert!(matches!(single_row("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn wrap_prefers_breaks_after_separators() {
        assert_eq!(
            wrap_to_width("aaaa bbbb cccc", 6),
            vec!["aaaa ", "bbbb ", "cccc"]
        );
        assert_eq!(wrap_to_width("\"key\": \"value\"", 8), vec!["\"key\": ", "\"value\""]);
    }

    #[test]
    fn wrap_cuts_hard_without_separators() {
        assert_eq!(wrap_to_width("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn wrap_keeps_short_and_zero_width_lines_whole() {
        assert_eq!(wrap_to_width("abc", 10), vec!["abc"]);
        assert_eq!(wrap_to_width("abcdef", 0), vec!["abcdef"]);
        assert_eq!(wrap_to_width("", 5), vec![""]);
    }

    #[test]
    fn counts_get_thousands_separators() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    proptest! {
        #[test]
        fn wrapped_rows_fit_and_rejoin(line in "[a-z ,:]{0,120}", width in 1usize..40) {
            let rows = wrap_to_width(&line, width);
            prop_assert_eq!(rows.concat(), line);
            for row in &rows {
                prop_assert!(row.width() <= width);
            }
        }
    }
}
