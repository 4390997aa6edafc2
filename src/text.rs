//! Pure text helpers: newline normalization, HTML-to-text stripping for
//! problem statements, and the Han-script routing heuristic.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static SCRIPT_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<\s*script[^>]*>.*?<\s*/\s*script\s*>").unwrap());
static STYLE_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<\s*style[^>]*>.*?<\s*/\s*style\s*>").unwrap());
static BREAK_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<\s*(?:br|p)\s*/?\s*>").unwrap());
static LIST_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<\s*li\s*(/?)\s*>").unwrap());
static BLOCK_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<\s*/\s*(?:div|tr)\s*>").unwrap());
static ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static HAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{Han}").unwrap());

// Decoded in this exact order.
const ENTITIES: [(&str, &str); 6] = [
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&amp;", "&"),
    ("&quot;", "\""),
    ("&#39;", "'"),
];

/// Marker appended when `html_to_text` truncates its output.
pub const TRUNCATION_MARKER: &str = "\n...";

/// Collapse CR/CRLF to LF and trim. Idempotent.
pub fn normalize_text(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n").trim().to_string()
}

/// Reduce a fragment of problem-statement HTML to plain text.
///
/// `max_chars` of 0 means unlimited; otherwise output beyond the cap is cut
/// (counted in chars) and [`TRUNCATION_MARKER`] is appended.
pub fn html_to_text(html: &str, max_chars: usize) -> String {
    if html.is_empty() {
        return String::new();
    }
    let text = SCRIPT_BLOCK.replace_all(html, "");
    let text = STYLE_BLOCK.replace_all(&text, "");
    let text = BREAK_TAG.replace_all(&text, "\n");
    // Open tags become bullets, self-closing variants just break the line.
    let text = LIST_TAG.replace_all(&text, |caps: &Captures| {
        if caps[1].is_empty() { "\n- " } else { "\n" }
    });
    let text = BLOCK_CLOSE.replace_all(&text, "\n");
    let mut text = ANY_TAG.replace_all(&text, "").into_owned();
    for (entity, plain) in ENTITIES {
        text = text.replace(entity, plain);
    }
    let text = EXCESS_NEWLINES.replace_all(&text, "\n\n");
    let text = normalize_text(&text);

    if max_chars > 0 && text.chars().count() > max_chars {
        let mut truncated: String = text.chars().take(max_chars).collect();
        truncated.push_str(TRUNCATION_MARKER);
        truncated
    } else {
        text
    }
}

/// True when the text contains a Han ideograph; used to route catalog
/// requests to the regional endpoint.
pub fn contains_han(text: &str) -> bool {
    HAN.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_line_endings_and_trims() {
        assert_eq!(normalize_text("  a\r\nb\rc\n  "), "a\nb\nc");
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        for input in ["  a\r\nb  ", "already clean", "\r\r\n\r", "多行\r\n文本"] {
            let once = normalize_text(input);
            assert_eq!(normalize_text(&once), once);
        }
    }

    #[test]
    fn paragraphs_become_lines() {
        assert_eq!(html_to_text("<p>A</p><p>B</p>", 100), "A\nB");
    }

    #[test]
    fn list_items_become_bullets() {
        let out = html_to_text("<ul><li>first</li><li>second</li></ul>", 100);
        assert_eq!(out, "- first\n- second");
    }

    #[test]
    fn script_and_style_bodies_are_dropped() {
        let html = "<p>kept</p><script>alert('x')</script><style>p{color:red}</style>";
        assert_eq!(html_to_text(html, 100), "kept");
    }

    #[test]
    fn entities_decode() {
        assert_eq!(html_to_text("1&nbsp;&lt;=&nbsp;n&nbsp;&lt;=&nbsp;10", 100), "1 <= n <= 10");
        assert_eq!(html_to_text("&quot;a&quot;&#39;b&#39; &amp; c", 100), "\"a\"'b' & c");
    }

    #[test]
    fn excess_blank_lines_collapse() {
        assert_eq!(html_to_text("a<br><br><br><br>b", 100), "a\n\nb");
    }

    #[test]
    fn truncation_appends_marker() {
        let long = "X".repeat(200);
        let out = html_to_text(&long, 10);
        assert_eq!(out, format!("{}{}", "X".repeat(10), TRUNCATION_MARKER));
    }

    #[test]
    fn zero_cap_means_unlimited() {
        let long = "X".repeat(200);
        assert_eq!(html_to_text(&long, 0).len(), 200);
    }

    #[test]
    fn han_detection() {
        assert!(contains_han("两数之和"));
        assert!(contains_han("mixed 中文 text"));
        assert!(!contains_han("two-sum"));
        assert!(!contains_han(""));
    }
}
