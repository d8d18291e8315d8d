use crate::engine::PageReport;
use crate::error::Result;
use crate::extract::MetricValue;
use async_trait::async_trait;

pub mod console;
pub mod csv;
pub mod json;
pub mod sqlite;

#[async_trait]
pub trait OutputHandler: Send + Sync {
    async fn write(&mut self, report: &PageReport) -> Result<()>;
    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

fn render(value: &MetricValue) -> String {
    match value {
        MetricValue::Int(n) => n.to_string(),
        MetricValue::Float(x) => x.to_string(),
        MetricValue::Text(s) => s.clone(),
        MetricValue::List(items) => items.join("; "),
        MetricValue::Counts(counts) => counts
            .iter()
            .map(|(name, n)| format!("{}:{}", name, n))
            .collect::<Vec<_>>()
            .join("; "),
    }
}

/// Report as flat `(column, value)` pairs: page fields first, then metrics by key.
pub fn flatten(report: &PageReport) -> Vec<(String, String)> {
    let mut row = vec![
        ("url".to_string(), report.url.clone()),
        ("final_url".to_string(), report.final_url.clone()),
        ("status_code".to_string(), report.status_code.to_string()),
        ("method".to_string(), report.method.to_string()),
        ("analyzed_at".to_string(), report.analyzed_at.clone()),
    ];
    row.extend(
        report
            .metrics
            .iter()
            .map(|(key, value)| (key.to_string(), render(value))),
    );
    row
}
