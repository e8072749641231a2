// Text formatters shared by the cards, views and status bar.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Counts with a thin-space thousands separator, French style
///
/// # Examples
/// ```ignore
/// assert_eq!(format_count(1234567), "1 234 567");
/// assert_eq!(format_count(42), "42");
/// ```
pub fn format_count(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();

    for (count, ch) in s.chars().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            result.insert(0, '\u{202f}');
        }
        result.insert(0, ch);
    }

    result
}

/// Cut `text` to `max` display columns, ending with `…` when shortened
pub fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w + 1 > max {
            break;
        }
        out.push(ch);
        width += w;
    }
    out.push('…');
    out
}

/// First line of a possibly multi-line text
pub fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_are_grouped() {
        assert_eq!(format_count(42), "42");
        assert_eq!(format_count(1234567), "1\u{202f}234\u{202f}567");
    }

    #[test]
    fn truncate_respects_display_width() {
        assert_eq!(truncate("Chaussures", 20), "Chaussures");
        assert_eq!(truncate("Chaussures", 6), "Chaus…");
        assert!(truncate("Été à Paris", 5).width() <= 5);
        assert_eq!(first_line("a\nb"), "a");
    }
}
