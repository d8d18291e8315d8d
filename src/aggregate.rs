//! Group-level reduction of per-page metrics.

use crate::extract::keys::{self, default_value};
use crate::extract::{MetricValue, MetricsRecord};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const HTML_SIZE_KB: &str = "html_size_kb";
pub const INLINE_JS_SIZE_KB: &str = "inline_js_size_kb";

/// Arithmetic means of a group's numeric metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupSummary(BTreeMap<String, f64>);

impl GroupSummary {
    /// Mean for `key`, or the metric's default (0, or 1 for the HTML/JS ratio) when absent.
    pub fn get(&self, key: &str) -> f64 {
        self.0.get(key).copied().unwrap_or_else(|| default_value(key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(String, f64)> for GroupSummary {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Mean of every numeric vocabulary key across `records`.
///
/// A record lacking a key contributes that key's default. Also derives
/// `html_size_kb` and `inline_js_size_kb`. An empty group yields an empty summary.
pub fn aggregate(records: &[MetricsRecord]) -> GroupSummary {
    if records.is_empty() {
        return GroupSummary::default();
    }
    let n = records.len() as f64;
    let mean = |key: &str| {
        records
            .iter()
            .map(|r| r.number(key).unwrap_or_else(|| default_value(key)))
            .sum::<f64>()
            / n
    };

    let mut summary: BTreeMap<String, f64> = keys::NUMERIC
        .iter()
        .map(|key| (key.to_string(), mean(key)))
        .collect();
    summary.insert(HTML_SIZE_KB.to_string(), mean(keys::TOTAL_LENGTH) / 1024.0);
    summary.insert(INLINE_JS_SIZE_KB.to_string(), mean(keys::INLINE_JS_SIZE) / 1024.0);
    GroupSummary(summary)
}

/// Union of a list-valued metric (frameworks, schema types, ...) across records.
pub fn union_list(records: &[MetricsRecord], key: &str) -> BTreeSet<String> {
    records
        .iter()
        .filter_map(|r| r.get(key).and_then(MetricValue::as_list))
        .flatten()
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::FeatureExtractor;

    #[test]
    fn single_record_is_reproduced() {
        let record = FeatureExtractor::default().extract(
            "<title>2025</title><p>one two</p><table><tr><td>1</td></tr></table>",
            Some("https://a.com/x/y"),
        );
        let summary = aggregate(std::slice::from_ref(&record));
        for key in keys::NUMERIC {
            assert_eq!(Some(summary.get(key)), record.number(key), "{}", key);
        }
    }

    #[test]
    fn means_over_records() {
        let mut a = MetricsRecord::new();
        a.set(keys::PARAGRAPHS_COUNT, MetricValue::Int(2));
        a.set(keys::TOTAL_LENGTH, MetricValue::Int(2048));
        let mut b = MetricsRecord::new();
        b.set(keys::PARAGRAPHS_COUNT, MetricValue::Int(4));
        b.set(keys::HTML_JS_BYTE_RATIO, 0.5);

        let summary = aggregate(&[a, b]);
        assert_eq!(summary.get(keys::PARAGRAPHS_COUNT), 3.0);
        // missing ratio counts as 1
        assert_eq!(summary.get(keys::HTML_JS_BYTE_RATIO), 0.75);
        assert_eq!(summary.get(HTML_SIZE_KB), 1.0);
        assert_eq!(summary.get(keys::TABLES_COUNT), 0.0);
    }

    #[test]
    fn list_metrics_are_not_averaged() {
        let record = FeatureExtractor::default().extract("<div class=\"flex\">", None);
        let summary = aggregate(&[record]);
        assert!(!summary.contains(keys::FRAMEWORKS_DETECTED));
        assert!(!summary.contains(keys::SCHEMA_TYPES));
    }

    #[test]
    fn empty_group_defaults() {
        let summary = aggregate(&[]);
        assert!(summary.is_empty());
        assert_eq!(summary.get(keys::HTML_JS_BYTE_RATIO), 1.0);
        assert_eq!(summary.get(keys::URL_DEPTH), 0.0);
    }

    #[test]
    fn unions_list_metrics() {
        let mut a = MetricsRecord::new();
        a.set(keys::SCHEMA_TYPES, vec!["Article".to_string()]);
        let mut b = MetricsRecord::new();
        b.set(keys::SCHEMA_TYPES, vec!["Article".to_string(), "FAQPage".to_string()]);
        let types = union_list(&[a, b, MetricsRecord::new()], keys::SCHEMA_TYPES);
        assert_eq!(types.into_iter().collect::<Vec<_>>(), vec!["Article", "FAQPage"]);
    }
}
