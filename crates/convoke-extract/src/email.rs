//! Email address pattern matching.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w.-]+@[\w.-]+").expect("invalid email regex"));

/// Locate the first email-pattern substring in the input.
///
/// Deliberately permissive -- the goal is to pull an address out of a chat
/// sentence, not to validate deliverability. Trailing sentence punctuation
/// is stripped from the match.
pub fn find_email(text: &str) -> Option<String> {
    EMAIL_RE
        .find(text)
        .map(|m| m.as_str().trim_end_matches('.').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_address_inside_a_sentence() {
        assert_eq!(
            find_email("send the invite to user@example.com please").as_deref(),
            Some("user@example.com")
        );
    }

    #[test]
    fn returns_first_of_multiple_addresses() {
        assert_eq!(
            find_email("a@b.com and c@d.com").as_deref(),
            Some("a@b.com")
        );
    }

    #[test]
    fn strips_trailing_sentence_punctuation() {
        assert_eq!(
            find_email("mail bob.smith@corp.example.com.").as_deref(),
            Some("bob.smith@corp.example.com")
        );
    }

    #[test]
    fn accepts_dots_dashes_and_underscores() {
        assert_eq!(
            find_email("first_last-x@mail-host.example.org works").as_deref(),
            Some("first_last-x@mail-host.example.org")
        );
    }

    #[test]
    fn none_without_at_sign() {
        assert!(find_email("just send it to bob").is_none());
    }
}
