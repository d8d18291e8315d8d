//! Pattern-based feature extraction.
//!
//! Each analyzer is a pure function from [`PageInput`] to a partial
//! [`MetricsRecord`]; the extractor runs all of them and merges the partials.
//! Key sets never overlap, and every analyzer fills all of its keys even for
//! empty markup.

pub mod content;
pub mod freshness;
pub mod keys;
pub mod patterns;
pub mod record;
pub mod structure;
pub mod technical;
pub mod url_structure;

pub use record::{MetricValue, MetricsRecord};

use once_cell::unsync::OnceCell;
use std::panic::{self, AssertUnwindSafe};
use structure::ResourceCounts;

pub const DEFAULT_FRESHNESS_YEAR: &str = "2025";

/// Markup plus the context the analyzers may consult.
///
/// Scans needed by more than one analyzer are computed on first use and
/// shared for the lifetime of the input.
#[derive(Debug, Clone)]
pub struct PageInput<'a> {
    pub html: &'a str,
    /// Resolved URL of the page, when known.
    pub url: Option<&'a str>,
    /// Year token the freshness signals look for.
    pub year: &'a str,
    resources: OnceCell<ResourceCounts>,
    tag_frequencies: OnceCell<Vec<(String, u64)>>,
}

impl<'a> PageInput<'a> {
    pub fn new(html: &'a str, url: Option<&'a str>) -> Self {
        Self {
            html,
            url,
            year: DEFAULT_FRESHNESS_YEAR,
            resources: OnceCell::new(),
            tag_frequencies: OnceCell::new(),
        }
    }

    pub fn with_year(mut self, year: &'a str) -> Self {
        self.year = year;
        self
    }

    fn empty(year: &'a str) -> Self {
        Self::new("", None).with_year(year)
    }

    /// Markup length in characters.
    pub fn char_len(&self) -> usize {
        self.html.chars().count()
    }

    pub fn resources(&self) -> &ResourceCounts {
        self.resources.get_or_init(|| ResourceCounts::scan(self.html))
    }

    pub fn tag_frequencies(&self) -> &[(String, u64)] {
        self.tag_frequencies
            .get_or_init(|| structure::tag_frequencies(self.html))
    }
}

pub type Analyzer = fn(&PageInput<'_>) -> MetricsRecord;

/// All analyzers, by name.
pub const ANALYZERS: &[(&str, Analyzer)] = &[
    ("basics", structure::basics),
    ("tags", structure::tags),
    ("resources", structure::resources),
    ("frameworks", structure::frameworks),
    ("performance", structure::performance),
    ("tables", content::tables),
    ("paragraphs", content::paragraphs),
    ("freshness", freshness::freshness),
    ("lists", content::lists),
    ("url_semantics", url_structure::url_semantics),
    ("subfolders", url_structure::subfolders),
    ("html_js", technical::html_js),
    ("schema", technical::schema),
    ("headings", content::headings),
];

#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    year: String,
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_FRESHNESS_YEAR)
    }
}

impl FeatureExtractor {
    pub fn new(year: impl Into<String>) -> Self {
        Self { year: year.into() }
    }

    /// Run every analyzer over `html`. `url` is the resolved page URL.
    pub fn extract(&self, html: &str, url: Option<&str>) -> MetricsRecord {
        let page = PageInput::new(html, url).with_year(&self.year);
        let mut record = MetricsRecord::new();
        for (name, analyzer) in ANALYZERS {
            record.merge(run_isolated(name, *analyzer, &page));
        }
        record
    }
}

/// Run one analyzer; if it panics, fall back to its empty-page output so the
/// remaining groups are unaffected.
fn run_isolated(name: &str, analyzer: Analyzer, page: &PageInput<'_>) -> MetricsRecord {
    match panic::catch_unwind(AssertUnwindSafe(|| analyzer(page))) {
        Ok(record) => record,
        Err(_) => {
            log::warn!("Analyzer '{}' failed; using defaults", name);
            analyzer(&PageInput::empty(page.year))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_markup_fills_whole_vocabulary() {
        let record = FeatureExtractor::default().extract("", None);
        for key in keys::NUMERIC.iter().chain(keys::NON_NUMERIC) {
            assert!(record.contains(key), "missing {}", key);
        }
        assert_eq!(record.len(), keys::NUMERIC.len() + keys::NON_NUMERIC.len());
        assert_eq!(record.number(keys::HTML_JS_BYTE_RATIO), Some(1.0));
        assert_eq!(record.number(keys::ATOMIC_PARAGRAPH_RATIO), Some(0.0));
    }

    #[test]
    fn analyzer_key_sets_do_not_overlap() {
        let page = PageInput::new("", None);
        let mut seen = std::collections::HashSet::new();
        for (name, analyzer) in ANALYZERS {
            for key in analyzer(&page).keys() {
                assert!(seen.insert(key.to_string()), "{} re-emits {}", name, key);
            }
        }
    }

    #[test]
    fn panicking_analyzer_falls_back_to_defaults() {
        fn flaky(page: &PageInput<'_>) -> MetricsRecord {
            if !page.html.is_empty() {
                panic!("boom");
            }
            let mut record = MetricsRecord::new();
            record.set("flaky", MetricValue::Int(0));
            record
        }
        let page = PageInput::new("<p>x</p>", None);
        let record = run_isolated("flaky", flaky, &page);
        assert_eq!(record.number("flaky"), Some(0.0));
    }

    #[test]
    fn shared_scans_agree_with_their_analyzers() {
        let html = r#"<main><img src="a.png"><img src="b.png"><script>x()</script></main>"#;
        let page = PageInput::new(html, None);
        let first = page.resources() as *const ResourceCounts;
        assert_eq!(page.resources().images, 2);
        assert!(std::ptr::eq(first, page.resources()));
        assert_eq!(page.tag_frequencies()[0], ("img".to_string(), 2));

        let record = FeatureExtractor::default().extract(html, None);
        assert_eq!(record.number(keys::IMAGES_COUNT), Some(2.0));
        assert_eq!(record.number(keys::INLINE_JS), Some(1.0));
        assert_eq!(record.number(keys::TOTAL_TAGS), Some(4.0));
        assert_eq!(
            record.get(keys::PERFORMANCE_INSIGHTS).and_then(MetricValue::as_list),
            Some(&[][..])
        );
    }

    #[test]
    fn configured_year_drives_freshness() {
        let html = "<title>Guide 2026</title>";
        let default = FeatureExtractor::default().extract(html, None);
        assert_eq!(default.number(keys::TITLE_YEAR_INCLUSION), Some(0.0));
        let custom = FeatureExtractor::new("2026").extract(html, None);
        assert_eq!(custom.number(keys::TITLE_YEAR_INCLUSION), Some(1.0));
    }

    #[test]
    fn realistic_page() {
        let html = r#"<!DOCTYPE html>
<html>
<head>
  <title>Best CRM Tools 2025</title>
  <meta name="description" content="Compare the top CRM tools in 2025">
  <script type="application/ld+json">{"@type":"Article"}</script>
</head>
<body>
  <header><nav><a href="https://example.com/blog/crm-tools">CRM</a></nav></header>
  <main>
    <h2>Top CRM tools</h2>
    <p>Short intro paragraph.</p>
    <ul><li>One</li><li>Two</li></ul>
    <table><tr><td>Price</td><td>$10</td></tr></table>
  </main>
</body>
</html>"#;
        let record = FeatureExtractor::default().extract(html, Some("https://example.com/blog/crm-tools"));
        assert_eq!(record.number(keys::TITLE_YEAR_INCLUSION), Some(1.0));
        assert_eq!(record.number(keys::META_YEAR_INCLUSION), Some(1.0));
        assert_eq!(record.number(keys::URL_DEPTH), Some(2.0));
        assert_eq!(record.number(keys::DEEP_LINK_DENSITY), Some(1.0));
        assert_eq!(record.number(keys::SCHEMA_TYPE_COUNT), Some(1.0));
        assert_eq!(record.number(keys::TABLE_DATA_DENSITY), Some(0.5));
        assert_eq!(record.number(keys::LISTS_COUNT), Some(1.0));
        assert_eq!(record.number(keys::KEYWORD_PRESENCE_RATIO), Some(2.0 / 3.0));
    }
}
