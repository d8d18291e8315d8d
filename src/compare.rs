//! Head-to-head comparison of two group summaries.

use crate::aggregate::{GroupSummary, HTML_SIZE_KB};
use crate::extract::keys;
use Policy::{ClosestTo, HigherIsBetter, LowerIsBetter};
use serde::{Deserialize, Serialize};

/// Which side a row or verdict favors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Indicator {
    A,
    B,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Policy {
    HigherIsBetter,
    LowerIsBetter,
    /// The value nearer the target wins.
    ClosestTo(f64),
}

impl Policy {
    pub fn judge(&self, a: f64, b: f64) -> Indicator {
        if a == b {
            return Indicator::Neutral;
        }
        let a_wins = match *self {
            Policy::HigherIsBetter => a > b,
            Policy::LowerIsBetter => a < b,
            Policy::ClosestTo(target) => (a - target).abs() < (b - target).abs(),
        };
        if a_wins { Indicator::A } else { Indicator::B }
    }
}

/// One compared metric.
#[derive(Debug, Clone, Copy)]
pub struct MetricDef {
    pub section: &'static str,
    pub label: &'static str,
    pub key: &'static str,
    pub policy: Policy,
}

const fn row(section: &'static str, label: &'static str, key: &'static str, policy: Policy) -> MetricDef {
    MetricDef {
        section,
        label,
        key,
        policy,
    }
}

const CONTENT: &str = "Content Structure";
const FRESHNESS: &str = "Freshness Signals";
const TABLES_LISTS: &str = "Tables & Lists";
const URLS: &str = "URL Structure";
const TECHNICAL: &str = "Technical Performance";
const SCHEMA: &str = "Schema & Resources";

pub const METRICS: &[MetricDef] = &[
    row(CONTENT, "Paragraphs Count", keys::PARAGRAPHS_COUNT, HigherIsBetter),
    row(CONTENT, "Avg Paragraph Length", keys::AVG_PARAGRAPH_LENGTH, LowerIsBetter),
    row(CONTENT, "Atomic Paragraph Ratio", keys::ATOMIC_PARAGRAPH_RATIO, HigherIsBetter),
    row(CONTENT, "H2 Tags", keys::H2_COUNT, HigherIsBetter),
    row(CONTENT, "H3 Tags", keys::H3_COUNT, HigherIsBetter),
    row(CONTENT, "Heading Coverage", keys::HEADING_COVERAGE_RATIO, HigherIsBetter),
    row(FRESHNESS, "URL Year Inclusion", keys::URL_YEAR_INCLUSION, HigherIsBetter),
    row(FRESHNESS, "Title Year Inclusion", keys::TITLE_YEAR_INCLUSION, HigherIsBetter),
    row(FRESHNESS, "Meta Year Inclusion", keys::META_YEAR_INCLUSION, HigherIsBetter),
    row(FRESHNESS, "Early Content Year", keys::EARLY_CONTENT_YEAR_INCLUSION, HigherIsBetter),
    row(TABLES_LISTS, "Tables Count", keys::TABLES_COUNT, HigherIsBetter),
    row(TABLES_LISTS, "Table Data Density", keys::TABLE_DATA_DENSITY, HigherIsBetter),
    row(TABLES_LISTS, "Lists Count", keys::LISTS_COUNT, HigherIsBetter),
    row(TABLES_LISTS, "List Coverage Ratio", keys::LIST_COVERAGE_RATIO, HigherIsBetter),
    row(URLS, "URL Depth", keys::URL_DEPTH, HigherIsBetter),
    row(URLS, "URL Token Count", keys::URL_TOKEN_COUNT, HigherIsBetter),
    row(URLS, "Keyword Presence", keys::KEYWORD_PRESENCE_RATIO, HigherIsBetter),
    row(URLS, "Stopword Ratio", keys::STOPWORD_RATIO, LowerIsBetter),
    row(TECHNICAL, "HTML/JS Ratio", keys::HTML_JS_BYTE_RATIO, HigherIsBetter),
    row(TECHNICAL, "Script Tag Density", keys::SCRIPT_TAG_DENSITY, LowerIsBetter),
    row(TECHNICAL, "External JS Files", keys::EXTERNAL_JS_COUNT, LowerIsBetter),
    row(SCHEMA, "Schema Blocks", keys::SCHEMA_BLOCKS_COUNT, HigherIsBetter),
    row(SCHEMA, "Schema Types", keys::SCHEMA_TYPE_COUNT, HigherIsBetter),
    row(SCHEMA, "HTML Size", HTML_SIZE_KB, LowerIsBetter),
    row(SCHEMA, "Images Count", keys::IMAGES_COUNT, ClosestTo(20.0)),
];

/// Metrics the overall verdict is voted on.
pub const KEY_METRICS: [&str; 6] = [
    keys::ATOMIC_PARAGRAPH_RATIO,
    keys::HEADING_COVERAGE_RATIO,
    keys::SCHEMA_BLOCKS_COUNT,
    keys::HTML_JS_BYTE_RATIO,
    keys::TABLE_DATA_DENSITY,
    keys::LIST_COVERAGE_RATIO,
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub section: String,
    pub label: String,
    pub key: String,
    pub value_a: f64,
    pub value_b: f64,
    pub indicator: Indicator,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub rows: Vec<ComparisonRow>,
    /// `None` when neither summary holds any key metric.
    pub verdict: Option<Indicator>,
    pub insights: Vec<String>,
}

/// Majority vote over the key metrics both summaries hold.
///
/// Each metric with a strictly higher value is one vote for that side; equal
/// values abstain. Equal vote counts give [`Indicator::Neutral`].
pub fn verdict(a: &GroupSummary, b: &GroupSummary) -> Option<Indicator> {
    let present: Vec<&str> = KEY_METRICS
        .iter()
        .copied()
        .filter(|k| a.contains(k) && b.contains(k))
        .collect();
    if present.is_empty() {
        return None;
    }
    let wins_a = present.iter().filter(|k| a.get(k) > b.get(k)).count();
    let wins_b = present.iter().filter(|k| b.get(k) > a.get(k)).count();
    Some(match wins_a.cmp(&wins_b) {
        std::cmp::Ordering::Greater => Indicator::A,
        std::cmp::Ordering::Less => Indicator::B,
        std::cmp::Ordering::Equal => Indicator::Neutral,
    })
}

fn freshness_composite(s: &GroupSummary) -> f64 {
    [
        keys::URL_YEAR_INCLUSION,
        keys::TITLE_YEAR_INCLUSION,
        keys::META_YEAR_INCLUSION,
        keys::EARLY_CONTENT_YEAR_INCLUSION,
    ]
    .iter()
    .map(|k| s.get(k))
    .sum::<f64>()
        / 4.0
}

fn directional(a: f64, b: f64, statement: &str) -> Option<String> {
    if a > b {
        Some(format!("Group A {}", statement))
    } else if b > a {
        Some(format!("Group B {}", statement))
    } else {
        None
    }
}

pub fn insights(a: &GroupSummary, b: &GroupSummary) -> Vec<String> {
    [
        directional(
            a.get(keys::ATOMIC_PARAGRAPH_RATIO),
            b.get(keys::ATOMIC_PARAGRAPH_RATIO),
            "has better atomic paragraph structure for answer engines",
        ),
        directional(
            freshness_composite(a),
            freshness_composite(b),
            "shows stronger freshness signals",
        ),
        directional(
            a.get(keys::SCHEMA_BLOCKS_COUNT),
            b.get(keys::SCHEMA_BLOCKS_COUNT),
            "has better structured data implementation",
        ),
        directional(
            a.get(keys::HTML_JS_BYTE_RATIO),
            b.get(keys::HTML_JS_BYTE_RATIO),
            "is more AEO-friendly with better HTML/JS balance",
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
}

pub fn compare(a: &GroupSummary, b: &GroupSummary) -> ComparisonReport {
    let rows = METRICS
        .iter()
        .map(|m| {
            let (value_a, value_b) = (a.get(m.key), b.get(m.key));
            ComparisonRow {
                section: m.section.to_string(),
                label: m.label.to_string(),
                key: m.key.to_string(),
                value_a,
                value_b,
                indicator: m.policy.judge(value_a, value_b),
            }
        })
        .collect();

    ComparisonReport {
        rows,
        verdict: verdict(a, b),
        insights: insights(a, b),
    }
}
