//! Small string helpers shared by HENRY crates.

use regex::Regex;
use std::sync::OnceLock;

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Works on character boundaries, so accented and multi-byte text is safe.
pub fn truncate_with_ellipsis(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => {
            let truncated = &s[..idx];
            format!("{}...", truncated.trim_end())
        }
        None => s.to_string(),
    }
}

/// Normalize an email for storage and lookup: trimmed and lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .unwrap_or_else(|e| panic!("email pattern must compile: {e}"))
    })
}

/// Check that an (already normalized) email has a plausible shape.
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Count characters the way the assistant approximates tokens.
pub fn char_len(s: &str) -> u64 {
    s.chars().count() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("hello", 10), "hello");
        assert_eq!(truncate_with_ellipsis("hello world", 5), "hello...");
        assert_eq!(truncate_with_ellipsis("presentación", 11), "presentació...");
        assert_eq!(truncate_with_ellipsis("", 10), "");
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Profesor@HENRY.edu "), "profesor@henry.edu");
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("maria.gonzalez+clase@henry.edu"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@x"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_char_len_counts_characters() {
        assert_eq!(char_len("hola"), 4);
        assert_eq!(char_len("evaluación"), 10);
    }
}
