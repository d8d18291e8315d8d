use super::OutputHandler;
use crate::engine::PageReport;
use crate::error::{Error, Result};
use crate::extract::keys;
use async_trait::async_trait;
use indicatif::MultiProgress;
use std::sync::Arc;

/// Headline metrics shown per page, in display order.
const HEADLINE: &[(&str, &str)] = &[
    ("Paragraphs", keys::PARAGRAPHS_COUNT),
    ("Atomic ratio", keys::ATOMIC_PARAGRAPH_RATIO),
    ("H2/H3 coverage", keys::HEADING_COVERAGE_RATIO),
    ("Schema blocks", keys::SCHEMA_BLOCKS_COUNT),
    ("HTML/JS ratio", keys::HTML_JS_BYTE_RATIO),
    ("URL depth", keys::URL_DEPTH),
];

/// Short per-page summary, routed through the progress bars when present.
pub struct ConsoleOutput {
    multi: Option<Arc<MultiProgress>>,
}

impl ConsoleOutput {
    pub fn new(multi: Option<Arc<MultiProgress>>) -> Self {
        Self { multi }
    }

    fn emit(&self, line: &str) -> Result<()> {
        match &self.multi {
            Some(multi) => multi
                .println(line)
                .map_err(|e| Error::Internal(e.to_string())),
            None => {
                println!("{}", line);
                Ok(())
            }
        }
    }
}

impl Default for ConsoleOutput {
    fn default() -> Self {
        Self::new(None)
    }
}

pub fn summary_lines(report: &PageReport) -> Vec<String> {
    let mut lines = vec![format!(
        "🌐 {} [{} {}]",
        report.final_url, report.status_code, report.method
    )];
    let metrics: Vec<String> = HEADLINE
        .iter()
        .filter_map(|(label, key)| {
            let value = report.metrics.number(key)?;
            Some(if value.fract() == 0.0 {
                format!("{}: {}", label, value)
            } else {
                format!("{}: {:.2}", label, value)
            })
        })
        .collect();
    lines.push(format!("   {}", metrics.join(" | ")));

    let frameworks = report
        .metrics
        .get(keys::FRAMEWORKS_DETECTED)
        .and_then(|v| v.as_list())
        .unwrap_or_default();
    if !frameworks.is_empty() {
        lines.push(format!("   Frameworks: {}", frameworks.join(", ")));
    }
    lines
}

#[async_trait]
impl OutputHandler for ConsoleOutput {
    async fn write(&mut self, report: &PageReport) -> Result<()> {
        for line in summary_lines(report) {
            self.emit(&line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::tests::sample_report;

    #[test]
    fn summarizes_headline_metrics() {
        let lines = summary_lines(&sample_report("https://a.com/x"));
        assert_eq!(lines[0], "🌐 https://a.com/x [200 secondary]");
        assert!(lines[1].contains("Paragraphs: 0"));
        assert!(lines[1].contains("HTML/JS ratio: 1"));
        assert!(lines[1].contains("URL depth: 1"));
        assert_eq!(lines[2], "   Frameworks: Tailwind CSS");
    }
}
