use super::PageInput;
use super::keys::*;
use super::patterns::{self, count};
use super::record::{MetricValue, MetricsRecord};
use std::collections::HashMap;

pub const SEMANTIC_TAGS: [&str; 7] = [
    "header", "nav", "main", "section", "article", "aside", "footer",
];

const TOP_TAGS: usize = 10;

pub fn basics(page: &PageInput<'_>) -> MetricsRecord {
    let html = page.html;
    let mut record = MetricsRecord::new();
    record.set(TOTAL_LENGTH, MetricValue::count(page.char_len()));
    record.set(TOTAL_LINES, MetricValue::count(html.split('\n').count()));
    record.set(META_TAGS_COUNT, MetricValue::count(count(&patterns::META_TAG, html)));
    record
}

/// Tag frequencies, most frequent first; equal counts keep first-seen order.
pub fn tag_frequencies(html: &str) -> Vec<(String, u64)> {
    let mut counts: HashMap<&str, (u64, usize)> = HashMap::new();
    for (idx, name) in patterns::captures(&patterns::OPENING_TAG, html)
        .into_iter()
        .enumerate()
    {
        counts.entry(name).or_insert((0, idx)).0 += 1;
    }

    let mut freq: Vec<_> = counts.into_iter().collect();
    freq.sort_by(|(_, (a_count, a_first)), (_, (b_count, b_first))| {
        b_count.cmp(a_count).then(a_first.cmp(b_first))
    });
    freq.into_iter()
        .map(|(name, (n, _))| (name.to_string(), n))
        .collect()
}

pub fn semantic_tags_used(freq: &[(String, u64)]) -> Vec<String> {
    SEMANTIC_TAGS
        .iter()
        .filter(|tag| freq.iter().any(|(name, _)| name == *tag))
        .map(|tag| tag.to_string())
        .collect()
}

pub fn tags(page: &PageInput<'_>) -> MetricsRecord {
    let freq = page.tag_frequencies();
    let total: u64 = freq.iter().map(|(_, n)| n).sum();

    let mut record = MetricsRecord::new();
    record.set(TOTAL_TAGS, MetricValue::Int(total as i64));
    record.set(UNIQUE_TAGS, MetricValue::count(freq.len()));
    record.set(SEMANTIC_TAGS_USED, semantic_tags_used(freq));
    record.set(
        MOST_COMMON_TAGS,
        MetricValue::Counts(freq.iter().take(TOP_TAGS).cloned().collect()),
    );
    record
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceCounts {
    pub external_css: usize,
    pub external_js: usize,
    pub inline_css: usize,
    pub inline_js: usize,
    pub images: usize,
    pub forms: usize,
}

impl ResourceCounts {
    pub fn scan(html: &str) -> Self {
        Self {
            external_css: count(&patterns::STYLESHEET_LINK, html),
            external_js: count(&patterns::EXTERNAL_SCRIPT, html),
            inline_css: count(&patterns::STYLE_BLOCK, html),
            inline_js: count(&patterns::SCRIPT_BLOCK, html),
            images: count(&patterns::IMG_TAG, html),
            forms: count(&patterns::FORM_TAG, html),
        }
    }
}

pub fn resources(page: &PageInput<'_>) -> MetricsRecord {
    let counts = page.resources();
    let mut record = MetricsRecord::new();
    record.set(EXTERNAL_CSS, MetricValue::count(counts.external_css));
    record.set(EXTERNAL_JS, MetricValue::count(counts.external_js));
    record.set(INLINE_CSS, MetricValue::count(counts.inline_css));
    record.set(INLINE_JS, MetricValue::count(counts.inline_js));
    record.set(IMAGES_COUNT, MetricValue::count(counts.images));
    record.set(FORMS_COUNT, MetricValue::count(counts.forms));
    record
}

pub fn detect_frameworks(html: &str) -> Vec<String> {
    let lower = html.to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

    let mut found = Vec::new();
    if has(&["react", "data-reactroot"]) {
        found.push("React");
    }
    if has(&["vue", "v-if", "v-for"]) {
        found.push("Vue.js");
    }
    if has(&["angular", "ng-"]) {
        found.push("Angular");
    }
    if has(&["jquery"]) {
        found.push("jQuery");
    }
    if has(&["bootstrap"]) {
        found.push("Bootstrap");
    }
    // utility-class probe runs on the original casing
    if has(&["tailwind"]) || patterns::UTILITY_CLASS.is_match(html) {
        found.push("Tailwind CSS");
    }
    if has(&["wp-content", "wordpress"]) {
        found.push("WordPress");
    }
    found.into_iter().map(String::from).collect()
}

pub fn frameworks(page: &PageInput<'_>) -> MetricsRecord {
    let mut record = MetricsRecord::new();
    record.set(FRAMEWORKS_DETECTED, detect_frameworks(page.html));
    record
}

pub fn performance_insights(
    counts: &ResourceCounts,
    total_length: usize,
    semantic_tags: &[String],
) -> Vec<String> {
    let mut insights = Vec::new();
    if counts.external_css > 5 {
        insights.push(format!(
            "High number of external CSS files ({}) - consider bundling",
            counts.external_css
        ));
    }
    if counts.external_js > 10 {
        insights.push(format!(
            "High number of external JS files ({}) - consider bundling",
            counts.external_js
        ));
    }
    if counts.images > 20 {
        insights.push(format!(
            "High number of images ({}) - consider lazy loading",
            counts.images
        ));
    }
    if total_length > 1_000_000 {
        insights.push("Large HTML size - consider minification and optimization".to_string());
    }
    if semantic_tags.is_empty() {
        insights.push("No HTML5 semantic tags found - consider improving accessibility".to_string());
    }
    insights
}

pub fn performance(page: &PageInput<'_>) -> MetricsRecord {
    let semantic = semantic_tags_used(page.tag_frequencies());
    let mut record = MetricsRecord::new();
    record.set(
        PERFORMANCE_INSIGHTS,
        performance_insights(page.resources(), page.char_len(), &semantic),
    );
    record
}
