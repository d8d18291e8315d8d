use crate::fetch::FetchMethod;
use crate::metrics::snapshot::MetricsSnapshot;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use std::time::{Duration, Instant};

#[derive(Clone)]
pub struct MetricsCollector {
    urls_queued: Arc<AtomicU64>,
    urls_processed: Arc<AtomicU64>,
    pages_analyzed: Arc<AtomicU64>,
    primary_successes: Arc<AtomicU64>,
    secondary_successes: Arc<AtomicU64>,
    tertiary_successes: Arc<AtomicU64>,
    fetch_failures: Arc<AtomicU64>,
    total_response_time_ms: Arc<AtomicU64>,
    start_time: Arc<Instant>,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self {
            urls_queued: Arc::new(AtomicU64::new(0)),
            urls_processed: Arc::new(AtomicU64::new(0)),
            pages_analyzed: Arc::new(AtomicU64::new(0)),
            primary_successes: Arc::new(AtomicU64::new(0)),
            secondary_successes: Arc::new(AtomicU64::new(0)),
            tertiary_successes: Arc::new(AtomicU64::new(0)),
            fetch_failures: Arc::new(AtomicU64::new(0)),
            total_response_time_ms: Arc::new(AtomicU64::new(0)),
            start_time: Arc::new(Instant::now()),
        }
    }
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_urls_queued(&self, n: u64) {
        self.urls_queued.fetch_add(n, Ordering::SeqCst);
    }

    pub fn increment_urls_processed(&self) {
        self.urls_processed.fetch_add(1, Ordering::SeqCst);
    }

    pub fn increment_pages_analyzed(&self) {
        self.pages_analyzed.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_success(&self, method: FetchMethod, duration: Duration) {
        let counter = match method {
            FetchMethod::Primary => &self.primary_successes,
            FetchMethod::Secondary => &self.secondary_successes,
            FetchMethod::Tertiary => &self.tertiary_successes,
        };
        counter.fetch_add(1, Ordering::SeqCst);
        self.total_response_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn record_failure(&self, duration: Duration) {
        self.fetch_failures.fetch_add(1, Ordering::SeqCst);
        self.total_response_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let primary = self.primary_successes.load(Ordering::SeqCst);
        let secondary = self.secondary_successes.load(Ordering::SeqCst);
        let tertiary = self.tertiary_successes.load(Ordering::SeqCst);
        let failed = self.fetch_failures.load(Ordering::SeqCst);
        let total_time = self.total_response_time_ms.load(Ordering::SeqCst);

        let success = primary + secondary + tertiary;
        let attempts = success + failed;

        let success_rate = if attempts > 0 {
            (success as f64 / attempts as f64) * 100.0
        } else {
            0.0
        };

        let avg_response_time_ms = if attempts > 0 {
            total_time / attempts
        } else {
            0
        };

        MetricsSnapshot {
            urls_queued: self.urls_queued.load(Ordering::SeqCst),
            urls_processed: self.urls_processed.load(Ordering::SeqCst),
            pages_analyzed: self.pages_analyzed.load(Ordering::SeqCst),
            primary_successes: primary,
            secondary_successes: secondary,
            tertiary_successes: tertiary,
            fetch_failures: failed,
            success_rate,
            avg_response_time_ms,
            elapsed_seconds: self.start_time.elapsed().as_secs_f64(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_successes_per_method() {
        let metrics = MetricsCollector::new();
        metrics.add_urls_queued(4);
        metrics.record_success(FetchMethod::Primary, Duration::from_millis(100));
        metrics.record_success(FetchMethod::Tertiary, Duration::from_millis(300));
        metrics.record_success(FetchMethod::Tertiary, Duration::from_millis(200));
        metrics.record_failure(Duration::from_millis(400));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.urls_queued, 4);
        assert_eq!(snapshot.primary_successes, 1);
        assert_eq!(snapshot.secondary_successes, 0);
        assert_eq!(snapshot.tertiary_successes, 2);
        assert_eq!(snapshot.successes(), 3);
        assert_eq!(snapshot.fallbacks(), 2);
        assert_eq!(snapshot.fetch_failures, 1);
        assert_eq!(snapshot.success_rate, 75.0);
        assert_eq!(snapshot.avg_response_time_ms, 250);
    }

    #[test]
    fn clones_share_counters() {
        let metrics = MetricsCollector::new();
        let clone = metrics.clone();
        clone.increment_urls_processed();
        clone.increment_pages_analyzed();
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.urls_processed, 1);
        assert_eq!(snapshot.pages_analyzed, 1);
        assert_eq!(snapshot.success_rate, 0.0);
    }
}
