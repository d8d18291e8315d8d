use super::PageInput;
use super::keys::*;
use super::patterns;
use super::record::{MetricValue, MetricsRecord};

/// How much leading visible text is searched for the year token.
pub const EARLY_CONTENT_CHARS: usize = 200;

/// Visible text: script and style blocks removed, then all tags, then whitespace collapsed.
pub fn visible_text(html: &str) -> String {
    let without_scripts = patterns::SCRIPT_BLOCK.replace_all(html, "");
    let without_styles = patterns::STYLE_BLOCK.replace_all(&without_scripts, "");
    let text = patterns::strip_tags(&without_styles);
    patterns::WHITESPACE
        .replace_all(&text, " ")
        .trim()
        .to_string()
}

/// Year token in the first [`EARLY_CONTENT_CHARS`] characters, provided the page
/// has at least that much visible text.
pub fn early_content_has(html: &str, year: &str) -> bool {
    let text = visible_text(html);
    let mut chars = text.char_indices();
    match chars.nth(EARLY_CONTENT_CHARS - 1) {
        Some((idx, c)) => text[..idx + c.len_utf8()].contains(year),
        None => false,
    }
}

pub fn freshness(page: &PageInput<'_>) -> MetricsRecord {
    let html = page.html;
    let year = page.year;

    let in_url = page.url.is_some_and(|url| url.contains(year));
    let in_title = patterns::TITLE
        .captures(html)
        .and_then(|c| c.get(1))
        .is_some_and(|m| m.as_str().contains(year));
    let in_meta = patterns::META_DESCRIPTION
        .captures(html)
        .and_then(|c| c.get(1))
        .is_some_and(|m| m.as_str().contains(year));

    let mut record = MetricsRecord::new();
    record.set(URL_YEAR_INCLUSION, MetricValue::flag(in_url));
    record.set(TITLE_YEAR_INCLUSION, MetricValue::flag(in_title));
    record.set(META_YEAR_INCLUSION, MetricValue::flag(in_meta));
    record.set(
        EARLY_CONTENT_YEAR_INCLUSION,
        MetricValue::flag(early_content_has(html, year)),
    );
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filler(n: usize) -> String {
        "x".repeat(n)
    }

    #[test]
    fn title_year() {
        let with = PageInput::new("<title>Best Tools 2025</title>", None);
        assert_eq!(freshness(&with).number(TITLE_YEAR_INCLUSION), Some(1.0));
        let without = PageInput::new("<title>Best Tools</title>", None);
        assert_eq!(freshness(&without).number(TITLE_YEAR_INCLUSION), Some(0.0));
    }

    #[test]
    fn url_and_meta_year() {
        let html = r#"<meta name="description" content="Updated for 2025">"#;
        let record = freshness(&PageInput::new(html, Some("https://a.com/best-2025")));
        assert_eq!(record.number(URL_YEAR_INCLUSION), Some(1.0));
        assert_eq!(record.number(META_YEAR_INCLUSION), Some(1.0));

        let record = freshness(&PageInput::new(html, None));
        assert_eq!(record.number(URL_YEAR_INCLUSION), Some(0.0));
    }

    #[test]
    fn year_match_is_substring() {
        let page = PageInput::new("<title>Build 20256</title>", None);
        assert_eq!(freshness(&page).number(TITLE_YEAR_INCLUSION), Some(1.0));
    }

    #[test]
    fn visible_text_drops_scripts_and_styles() {
        let html = "<head><style>a{}</style><script>var y = 2025;</script></head><body>\n  <h1>Hello</h1>\n <p>world</p></body>";
        assert_eq!(visible_text(html), "Hello world");
    }

    #[test]
    fn early_content_needs_enough_text() {
        let short = "<p>Guide 2025</p>";
        assert!(!early_content_has(short, "2025"));

        let early = format!("<p>Guide 2025 {}</p>", filler(250));
        assert!(early_content_has(&early, "2025"));

        let late = format!("<p>{} 2025</p>", filler(250));
        assert!(!early_content_has(&late, "2025"));

        let script_only = format!("<script>2025</script><p>{}</p>", filler(250));
        assert!(!early_content_has(&script_only, "2025"));
    }
}
