use serde::{Deserialize, Serialize};

/// Point-in-time view of an analysis run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub urls_queued: u64,
    pub urls_processed: u64,
    pub pages_analyzed: u64,
    pub primary_successes: u64,
    pub secondary_successes: u64,
    pub tertiary_successes: u64,
    pub fetch_failures: u64,
    pub success_rate: f64,
    pub avg_response_time_ms: u64,
    pub elapsed_seconds: f64,
}

impl MetricsSnapshot {
    pub fn successes(&self) -> u64 {
        self.primary_successes + self.secondary_successes + self.tertiary_successes
    }

    /// Successes that needed at least one fallback stage.
    pub fn fallbacks(&self) -> u64 {
        self.secondary_successes + self.tertiary_successes
    }
}
