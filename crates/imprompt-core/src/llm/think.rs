//! Removal of `<think>...</think>` reasoning spans from model output.

use regex::Regex;
use std::sync::OnceLock;

fn think_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)<think>.*?</think>").expect("valid think-tag regex"))
}

/// Strip every `<think>` span (non-greedy, across newlines) and trim the rest.
pub fn strip_think_tags(text: &str) -> String {
    if !text.contains("<think>") {
        return text.trim().to_string();
    }
    think_pattern().replace_all(text, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_trimmed() {
        assert_eq!(strip_think_tags("  a quiet harbor at dusk \n"), "a quiet harbor at dusk");
    }

    #[test]
    fn test_single_span_removed() {
        assert_eq!(
            strip_think_tags("<think>planning</think>A red kite."),
            "A red kite."
        );
    }

    #[test]
    fn test_multiline_span_removed() {
        let raw = "<think>\nstep one\nstep two\n</think>\n\nA figure in matte armor.";
        assert_eq!(strip_think_tags(raw), "A figure in matte armor.");
    }

    #[test]
    fn test_multiple_spans_are_non_greedy() {
        let raw = "<think>a</think>Left <think>b</think>right";
        assert_eq!(strip_think_tags(raw), "Left right");
    }

    #[test]
    fn test_inner_whitespace_preserved() {
        let raw = "Line one\n\n<think>x</think>Line  two";
        assert_eq!(strip_think_tags(raw), "Line one\n\nLine  two");
    }

    #[test]
    fn test_unclosed_span_left_alone() {
        assert_eq!(strip_think_tags("<think>never closed"), "<think>never closed");
    }
}
