//! Terminal display width helpers.

/// Compute the display width of a string after stripping ANSI escapes.
pub fn display_width(text: &str) -> usize {
    let clean = strip_ansi_escapes::strip(text);
    let clean_str = String::from_utf8_lossy(&clean);
    unicode_width::UnicodeWidthStr::width(&*clean_str)
}

/// Truncate `text` so its display width does not exceed `width`.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    let mut out = String::new();
    for ch in text.chars() {
        out.push(ch);
        if display_width(&out) > width {
            out.pop();
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ansi_sequences_do_not_count() {
        assert_eq!(display_width("\x1b[1mbold\x1b[0m"), 4);
    }

    #[test]
    fn truncate_respects_wide_chars() {
        assert_eq!(truncate_to_width("ab—cd", 3), "ab—");
        assert_eq!(truncate_to_width("hello", 10), "hello");
    }
}
