//! Shared utility functions used across modules.

use unicode_width::UnicodeWidthChar;

use crate::constants::SPINNER_CHARS;

/// Truncate a string to `max_width` display columns, appending "..." if truncated.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    if unicode_width::UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    // When max_width <= 3, no room for "...", just hard-cut
    let (budget, suffix) = if max_width > 3 {
        (max_width - 3, "...")
    } else {
        (max_width, "")
    };

    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str(suffix);
    out
}

/// Get the spinner character for the current tick.
pub fn spinner_char(tick: u64) -> &'static str {
    SPINNER_CHARS[(tick % SPINNER_CHARS.len() as u64) as usize]
}

/// Fixed-width text bar for `part` out of `total`, e.g. `████░░░░`.
pub fn text_bar(part: u64, total: u64, width: usize) -> String {
    let filled = if total == 0 {
        0
    } else {
        ((part as f64 / total as f64) * width as f64).round() as usize
    }
    .min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── truncate_str ──────────────────────────────────────────────

    #[test]
    fn truncate_str_short_string_unchanged() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello", 5), "hello");
    }

    #[test]
    fn truncate_str_needs_truncation() {
        assert_eq!(truncate_str("hello world", 8), "hello...");
    }

    #[test]
    fn truncate_str_tiny_widths_hard_cut() {
        assert_eq!(truncate_str("abcdef", 3), "abc");
        assert_eq!(truncate_str("abcdef", 0), "");
    }

    #[test]
    fn truncate_str_counts_wide_chars_as_two() {
        // Each CJK char is two columns; 7 columns leave room for two of them.
        assert_eq!(truncate_str("日本語テキスト", 7), "日本...");
    }

    #[test]
    fn truncate_str_does_not_split_multibyte() {
        assert_eq!(truncate_str("ééééééé", 5), "éé...");
    }

    // ── spinner_char ──────────────────────────────────────────────

    #[test]
    fn spinner_char_cycles() {
        assert_eq!(spinner_char(0), "◐");
        assert_eq!(spinner_char(3), "◒");
        assert_eq!(spinner_char(4), "◐");
    }

    // ── text_bar ──────────────────────────────────────────────────

    #[test]
    fn text_bar_fills_proportionally() {
        assert_eq!(text_bar(5, 10, 4), "██░░");
        assert_eq!(text_bar(0, 10, 3), "░░░");
        assert_eq!(text_bar(10, 10, 3), "███");
    }

    #[test]
    fn text_bar_handles_zero_total() {
        assert_eq!(text_bar(3, 0, 5), "░░░░░");
    }
}
