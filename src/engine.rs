//! Sequential driver: URL list in, per-page reports out.

use crate::error::Result;
use crate::extract::{FeatureExtractor, MetricsRecord};
use crate::fetch::{FetchMethod, Fetcher};
use crate::metrics::{MetricsCollector, MetricsSnapshot};
use crate::output::OutputHandler;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Extra pause range between URLs when stealth mode is on.
pub const STEALTH_DELAY_MS: (u64, u64) = (2000, 5000);

/// One analyzed page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageReport {
    pub url: String,
    pub final_url: String,
    pub status_code: u16,
    pub method: FetchMethod,
    pub analyzed_at: String,
    pub metrics: MetricsRecord,
}

/// Outcome of one group: reports in input order plus `(url, error)` pairs.
#[derive(Debug, Clone, Default)]
pub struct GroupRun {
    pub name: String,
    pub reports: Vec<PageReport>,
    pub failures: Vec<(String, String)>,
}

impl GroupRun {
    pub fn records(&self) -> Vec<MetricsRecord> {
        self.reports.iter().map(|r| r.metrics.clone()).collect()
    }
}

/// Trim lines, drop blanks, keep at most `max_urls`.
pub fn parse_url_list(text: &str, max_urls: usize) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(max_urls)
        .map(String::from)
        .collect()
}

pub struct AnalysisEngine {
    fetcher: Fetcher,
    extractor: FeatureExtractor,
    timeout: Duration,
    stealth_delay: bool,
    rng: Mutex<StdRng>,
    metrics: MetricsCollector,
}

impl AnalysisEngine {
    pub fn new(fetcher: Fetcher, extractor: FeatureExtractor, timeout: Duration) -> Self {
        Self {
            fetcher,
            extractor,
            timeout,
            stealth_delay: false,
            rng: Mutex::new(StdRng::from_entropy()),
            metrics: MetricsCollector::new(),
        }
    }

    pub fn with_stealth_delay(mut self, enabled: bool) -> Self {
        self.stealth_delay = enabled;
        self
    }

    fn stealth_pause(&self) -> Duration {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Duration::from_millis(rng.gen_range(STEALTH_DELAY_MS.0..=STEALTH_DELAY_MS.1))
    }

    /// Fetch and analyze `urls` one at a time, streaming each report to `sink`.
    ///
    /// A failed URL is logged and recorded; it never aborts the batch. Sink
    /// errors do.
    pub async fn run_group(
        &self,
        name: &str,
        urls: &[String],
        sink: &mut dyn OutputHandler,
    ) -> Result<GroupRun> {
        log::info!("Analyzing group '{}' ({} URLs)", name, urls.len());
        self.metrics.add_urls_queued(urls.len() as u64);

        let mut run = GroupRun {
            name: name.to_string(),
            ..Default::default()
        };

        for (i, url) in urls.iter().enumerate() {
            if self.stealth_delay && i > 0 {
                let pause = self.stealth_pause();
                log::debug!("Stealth pause {}ms", pause.as_millis());
                tokio::time::sleep(pause).await;
            }

            let started = Instant::now();
            let result = self.fetcher.fetch(url, self.timeout).await;
            let elapsed = started.elapsed();
            self.metrics.increment_urls_processed();

            match result {
                Ok(page) => {
                    self.metrics.record_success(page.method, elapsed);
                    let metrics = self.extractor.extract(&page.html, Some(&page.resolved_url));
                    self.metrics.increment_pages_analyzed();

                    let report = PageReport {
                        url: url.clone(),
                        final_url: page.resolved_url,
                        status_code: page.status_code,
                        method: page.method,
                        analyzed_at: chrono::Utc::now().to_rfc3339(),
                        metrics,
                    };
                    sink.write(&report).await?;
                    run.reports.push(report);
                }
                Err(e) => {
                    self.metrics.record_failure(elapsed);
                    log::error!("Failed to analyze {}: {}", url, e);
                    run.failures.push((url.clone(), e.to_string()));
                }
            }
        }

        log::info!(
            "Group '{}' done: {} analyzed, {} failed",
            name,
            run.reports.len(),
            run.failures.len()
        );
        Ok(run)
    }

    pub fn get_metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn watch_metrics(&self) -> watch::Receiver<MetricsSnapshot> {
        let (tx, rx) = watch::channel(self.metrics.snapshot());
        let metrics = self.metrics.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(500));
            loop {
                interval.tick().await;
                if tx.send(metrics.snapshot()).is_err() {
                    break;
                }
            }
        });
        rx
    }
}
