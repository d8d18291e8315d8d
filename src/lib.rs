pub mod aggregate;
pub mod compare;
pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod metrics;
pub mod output;

pub use aggregate::{GroupSummary, aggregate};
pub use compare::{ComparisonReport, Indicator, compare};
pub use engine::{AnalysisEngine, GroupRun, PageReport};
pub use error::{Error, Result};
pub use extract::{FeatureExtractor, MetricValue, MetricsRecord};
pub use fetch::{FetchMethod, FetchedPage, Fetcher};
pub use metrics::{MetricsCollector, MetricsSnapshot};
