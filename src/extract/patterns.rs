//! Compiled markup patterns shared by the analyzers.
//!
//! Scanning is non-validating: a pattern like `<p[^>]*>` also
//! matches `<pre>` and `<param>`, and lazy block patterns pair an opening tag
//! with the first closing tag after it regardless of nesting.

use once_cell::sync::Lazy;
use regex::Regex;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern}: {e}"))
}

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        pub static $name: Lazy<Regex> = Lazy::new(|| compile($re));
    };
}

pattern!(OPENING_TAG, r"(?i)<(\w+)[^>]*>");
pattern!(ANY_TAG, r"<[^>]+>");
pattern!(META_TAG, r"(?i)<meta[^>]*>");

pattern!(STYLESHEET_LINK, r#"(?i)<link[^>]*rel=["']stylesheet["'][^>]*>"#);
pattern!(EXTERNAL_SCRIPT, r"(?i)<script[^>]*src=[^>]*>");
pattern!(STYLE_BLOCK, r"(?is)<style[^>]*>.*?</style>");
pattern!(SCRIPT_BLOCK, r"(?is)<script[^>]*>(.*?)</script>");
pattern!(SCRIPT_OPEN, r"(?i)<script[^>]*>");
pattern!(IMG_TAG, r"(?i)<img[^>]*>");
pattern!(FORM_TAG, r"(?i)<form[^>]*>");

pattern!(UTILITY_CLASS, r#"class="[^"]*\b(flex|grid|bg-|text-|p-|m-)"#);

pattern!(TABLE_BLOCK, r"(?is)<table[^>]*>.*?</table>");
pattern!(TR_OPEN, r"(?i)<tr[^>]*>");
pattern!(CELL, r"(?is)<(?:td|th)[^>]*>(.*?)</(?:td|th)>");
pattern!(DIGIT, r"\d+");

pattern!(PARAGRAPH_BLOCK, r"(?is)<p[^>]*>(.*?)</p>");
pattern!(P_OPEN, r"(?i)<p[^>]*>");

pattern!(TITLE, r"(?is)<title[^>]*>(.*?)</title>");
pattern!(
    META_DESCRIPTION,
    r#"(?i)<meta[^>]*name=["']description["'][^>]*content=["']([^"']*)["']"#
);
pattern!(WHITESPACE, r"\s+");

pattern!(UL_BLOCK, r"(?is)<ul[^>]*>.*?</ul>");
pattern!(OL_BLOCK, r"(?is)<ol[^>]*>.*?</ol>");
pattern!(LI_OPEN, r"(?i)<li[^>]*>");

pattern!(H2_H3_BLOCK, r"(?is)<h[23][^>]*>(.*?)</h[23]>");
pattern!(URL_SEPARATORS, r"[-_/]+");

pattern!(
    JSON_LD_BLOCK,
    r#"(?is)<script[^>]*type=["']application/ld\+json["'][^>]*>(.*?)</script>"#
);

pattern!(H2_OPEN, r"(?i)<h2[^>]*>");
pattern!(H3_OPEN, r"(?i)<h3[^>]*>");
pattern!(
    CONTENT_DIV,
    r"(?i)<div[^>]*class=[^>]*(?:content|text|article)[^>]*>"
);

/// Remove every `<...>` tag, keeping the text between them.
pub fn strip_tags(fragment: &str) -> String {
    ANY_TAG.replace_all(fragment, "").into_owned()
}

pub fn count(re: &Regex, haystack: &str) -> usize {
    re.find_iter(haystack).count()
}

/// First capture group of every match.
pub fn captures<'h>(re: &Regex, haystack: &'h str) -> Vec<&'h str> {
    re.captures_iter(haystack)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect()
}

/// Zero-guarded division; `default` when the denominator is zero.
pub fn ratio(numerator: f64, denominator: f64, default: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        default
    }
}
