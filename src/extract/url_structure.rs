use super::PageInput;
use super::keys::*;
use super::patterns::{self, ratio};
use super::record::{MetricValue, MetricsRecord};
use regex::Regex;
use url::{Position, Url};

pub const STOPWORDS: [&str; 15] = [
    "and", "the", "of", "to", "a", "in", "for", "is", "on", "with", "as", "by", "at", "or", "an",
];

fn path_segments(url: &Url) -> Vec<&str> {
    url.path().split('/').filter(|s| !s.is_empty()).collect()
}

/// Path tokens split on `-`, `_` and `/`, empties dropped.
pub fn path_tokens(url: &Url) -> Vec<String> {
    patterns::URL_SEPARATORS
        .split(url.path().trim_matches('/'))
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Lowercased text of every H2/H3, tags stripped, space separated.
fn subheading_text(html: &str) -> String {
    patterns::captures(&patterns::H2_H3_BLOCK, html)
        .into_iter()
        .map(|h| patterns::strip_tags(h).to_lowercase() + " ")
        .collect()
}

pub fn url_semantics(page: &PageInput<'_>) -> MetricsRecord {
    let tokens = page
        .url
        .and_then(|u| Url::parse(u).ok())
        .map(|u| path_tokens(&u))
        .unwrap_or_default();

    let (keyword_ratio, stopword_ratio) = if tokens.is_empty() {
        (0.0, 0.0)
    } else {
        let headings = subheading_text(page.html);
        let n = tokens.len() as f64;
        let keywords = tokens
            .iter()
            .filter(|t| headings.contains(&t.to_lowercase()))
            .count();
        let stopwords = tokens
            .iter()
            .filter(|t| STOPWORDS.contains(&t.to_lowercase().as_str()))
            .count();
        (ratio(keywords as f64, n, 0.0), ratio(stopwords as f64, n, 0.0))
    };

    let mut record = MetricsRecord::new();
    record.set(URL_TOKEN_COUNT, MetricValue::count(tokens.len()));
    record.set(KEYWORD_PRESENCE_RATIO, keyword_ratio);
    record.set(STOPWORD_RATIO, stopword_ratio);
    record
}

/// Share of same-origin `href` targets whose path is at least two segments deep.
pub fn deep_link_density(url: &Url, html: &str) -> f64 {
    let origin = &url[..Position::BeforePath];
    let Ok(link_re) = Regex::new(&format!(
        r#"(?i)href=["']({}[^"']*)["']"#,
        regex::escape(origin)
    )) else {
        return 0.0;
    };

    let links = patterns::captures(&link_re, html);
    let deep = links
        .iter()
        .filter(|link| {
            Url::parse(link)
                .map(|l| path_segments(&l).len() >= 2)
                .unwrap_or(false)
        })
        .count();
    ratio(deep as f64, links.len() as f64, 0.0)
}

pub fn subfolders(page: &PageInput<'_>) -> MetricsRecord {
    let parsed = page.url.and_then(|u| Url::parse(u).ok());

    let (depth, first, density) = match &parsed {
        Some(url) => {
            let segments = path_segments(url);
            (
                segments.len(),
                segments.first().map(|s| s.to_string()).unwrap_or_default(),
                deep_link_density(url, page.html),
            )
        }
        None => (0, String::new(), 0.0),
    };

    let mut record = MetricsRecord::new();
    record.set(URL_DEPTH, MetricValue::count(depth));
    record.set(SUBFOLDER_PAGE_RATIO, MetricValue::flag(depth >= 2));
    record.set(MOST_COMMON_SUBFOLDER, first);
    record.set(DEEP_LINK_DENSITY, density);
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_and_first_subfolder() {
        let record = subfolders(&PageInput::new("", Some("https://a.com/cat/sub/page")));
        assert_eq!(record.number(URL_DEPTH), Some(3.0));
        assert_eq!(record.number(SUBFOLDER_PAGE_RATIO), Some(1.0));
        assert_eq!(
            record.get(MOST_COMMON_SUBFOLDER),
            Some(&MetricValue::Text("cat".to_string()))
        );
    }

    #[test]
    fn shallow_and_missing_urls() {
        let shallow = subfolders(&PageInput::new("", Some("https://a.com/page")));
        assert_eq!(shallow.number(URL_DEPTH), Some(1.0));
        assert_eq!(shallow.number(SUBFOLDER_PAGE_RATIO), Some(0.0));

        let none = subfolders(&PageInput::new("", None));
        assert_eq!(none.number(URL_DEPTH), Some(0.0));
        assert_eq!(none.get(MOST_COMMON_SUBFOLDER), Some(&MetricValue::Text(String::new())));
        assert_eq!(none.number(DEEP_LINK_DENSITY), Some(0.0));
    }

    #[test]
    fn deep_links_only_count_same_origin() {
        let html = r#"
            <a href="https://a.com/blog/post">deep</a>
            <a href='https://A.com/about'>shallow</a>
            <a href="https://other.com/x/y">external</a>
            <a href="/relative/path">relative</a>
        "#;
        let url = Url::parse("https://a.com/").unwrap();
        assert_eq!(deep_link_density(&url, html), 0.5);
        assert_eq!(deep_link_density(&url, "<p>no links</p>"), 0.0);
    }

    #[test]
    fn url_tokens_against_subheadings() {
        let html = "<h2>Best <em>Running</em> Shoes</h2><h3>For beginners</h3>";
        let page = PageInput::new(html, Some("https://a.com/best-running_shoes/for-the-road"));
        let record = url_semantics(&page);
        assert_eq!(record.number(URL_TOKEN_COUNT), Some(6.0));
        // "the" and "road" never appear in a subheading
        assert_eq!(record.number(KEYWORD_PRESENCE_RATIO), Some(4.0 / 6.0));
        assert_eq!(record.number(STOPWORD_RATIO), Some(2.0 / 6.0));
    }

    #[test]
    fn empty_path_gives_zero_ratios() {
        let record = url_semantics(&PageInput::new("<h2>x</h2>", Some("https://a.com/")));
        assert_eq!(record.number(URL_TOKEN_COUNT), Some(0.0));
        assert_eq!(record.number(KEYWORD_PRESENCE_RATIO), Some(0.0));
        assert_eq!(record.number(STOPWORD_RATIO), Some(0.0));
    }
}
