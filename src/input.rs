//! Input classification: decide what the raw query text is before spending
//! any network round-trip on it.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::text::normalize_text;

static SLUG_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)problems/([a-z0-9-]+)").unwrap());
static ID_FORM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:lc\s*|leetcode\s*)?([0-9]{1,5})$").unwrap());
static SENTENCE_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.。!?！？]").unwrap());

const KEYWORD_MAX_CHARS: usize = 80;
const SENTENCE_MIN_CHARS: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Empty,
    Slug,
    Id,
    Keyword,
    Statement,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedInput {
    pub kind: InputKind,
    pub value: String,
}

impl ClassifiedInput {
    fn new(kind: InputKind, value: impl Into<String>) -> Self {
        Self { kind, value: value.into() }
    }
}

/// Classify raw query text. First match wins:
/// problem URL, numeric ID, short keyword, full statement.
pub fn classify(raw: &str) -> ClassifiedInput {
    let cleaned = normalize_text(raw);
    if cleaned.is_empty() {
        return ClassifiedInput::new(InputKind::Empty, "");
    }
    if let Some(caps) = SLUG_URL.captures(&cleaned) {
        return ClassifiedInput::new(InputKind::Slug, &caps[1]);
    }
    if let Some(caps) = ID_FORM.captures(&cleaned) {
        return ClassifiedInput::new(InputKind::Id, &caps[1]);
    }
    if cleaned.chars().count() < KEYWORD_MAX_CHARS && !looks_like_sentence(&cleaned) {
        return ClassifiedInput::new(InputKind::Keyword, cleaned);
    }
    ClassifiedInput::new(InputKind::Statement, cleaned)
}

// A heuristic, not a parser: anything long or carrying terminal punctuation
// is treated as prose.
fn looks_like_sentence(text: &str) -> bool {
    text.chars().count() > SENTENCE_MIN_CHARS || SENTENCE_PUNCT.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_of(raw: &str) -> InputKind {
        classify(raw).kind
    }

    #[test]
    fn whitespace_only_is_empty() {
        assert_eq!(kind_of(""), InputKind::Empty);
        assert_eq!(kind_of("   \r\n\t "), InputKind::Empty);
    }

    #[test]
    fn problem_urls_capture_the_slug() {
        let input = classify("https://leetcode.com/problems/two-sum/description/");
        assert_eq!(input.kind, InputKind::Slug);
        assert_eq!(input.value, "two-sum");

        let input = classify("https://leetcode.cn/problems/add-two-numbers");
        assert_eq!(input.kind, InputKind::Slug);
        assert_eq!(input.value, "add-two-numbers");
    }

    #[test]
    fn slug_wins_over_surrounding_prose() {
        let input = classify("see problems/median-of-two-sorted-arrays for details");
        assert_eq!(input.kind, InputKind::Slug);
        assert_eq!(input.value, "median-of-two-sorted-arrays");
    }

    #[test]
    fn bare_and_prefixed_numbers_are_ids() {
        for raw in ["1", "00042", "12345", "LC 15", "lc15", "leetcode 239", "LeetCode 7"] {
            let input = classify(raw);
            assert_eq!(input.kind, InputKind::Id, "raw: {raw:?}");
        }
        assert_eq!(classify("LC 15").value, "15");
    }

    #[test]
    fn six_digits_is_not_an_id() {
        assert_eq!(kind_of("123456"), InputKind::Keyword);
    }

    #[test]
    fn short_phrases_are_keywords() {
        assert_eq!(kind_of("two sum"), InputKind::Keyword);
        assert_eq!(kind_of("两数之和"), InputKind::Keyword);
        // Short fragments stay keywords even when they read like prose; the
        // heuristic only looks at length and punctuation.
        assert_eq!(kind_of("reverse a linked list in place"), InputKind::Keyword);
    }

    #[test]
    fn punctuation_makes_a_statement() {
        assert_eq!(kind_of("Given an array, return the two indices."), InputKind::Statement);
        assert_eq!(kind_of("给定一个数组，找出两个数。"), InputKind::Statement);
        assert_eq!(kind_of("does it work?"), InputKind::Statement);
    }

    #[test]
    fn long_text_is_a_statement() {
        let long = "a".repeat(130);
        assert_eq!(kind_of(&long), InputKind::Statement);
    }

    #[test]
    fn statement_value_is_normalized() {
        let input = classify("  Given nums.\r\nReturn indices.  ");
        assert_eq!(input.kind, InputKind::Statement);
        assert_eq!(input.value, "Given nums.\nReturn indices.");
    }
}
