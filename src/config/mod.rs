pub mod loader;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{AnalysisConfig, DelayConfig, GroupConfig, OutputConfig};
