use crate::extract::DEFAULT_FRESHNESS_YEAR;
use crate::fetch::identity::DelayRange;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_config"))]
pub struct AnalysisConfig {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub name: String,

    /// One group to analyze, or two to compare.
    #[serde(default)]
    #[validate(length(min = 1, max = 2))]
    pub groups: Vec<GroupConfig>,

    /// Per-attempt timeout.
    #[serde(default = "default_timeout")]
    #[validate(range(min = 1))]
    pub timeout_secs: u64,

    #[serde(default = "default_max_urls")]
    #[validate(range(min = 1))]
    pub max_urls: usize,

    /// Extra 2-5 s pause between URLs.
    #[serde(default)]
    pub stealth_delay: bool,

    #[serde(default)]
    pub pre_request_delay_ms: DelayConfig,

    #[serde(default = "default_year")]
    #[validate(length(equal = 4))]
    pub freshness_year: String,

    #[serde(default)]
    pub output: Option<OutputConfig>,

    /// Optional path to a parent configuration file to inherit from
    #[serde(default)]
    pub extends: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupConfig {
    pub name: String,

    #[serde(default)]
    pub urls: Vec<String>,

    /// Newline-separated URL list, relative to the config file.
    #[serde(default)]
    pub urls_file: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayConfig {
    pub min: u64,
    pub max: u64,
}

impl Default for DelayConfig {
    fn default() -> Self {
        let range = DelayRange::default();
        Self {
            min: range.min_ms,
            max: range.max_ms,
        }
    }
}

impl From<DelayConfig> for DelayRange {
    fn from(delay: DelayConfig) -> Self {
        DelayRange::new(delay.min, delay.max)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutputConfig {
    Console,
    Json {
        path: String,
    },
    Csv {
        path: String,
    },
    Sqlite {
        path: String,
        #[serde(default = "default_table_name")]
        table: String,
    },
}

fn validate_config(config: &AnalysisConfig) -> Result<(), ValidationError> {
    let delay = config.pre_request_delay_ms;
    if delay.min > delay.max {
        return Err(ValidationError::new("pre_request_delay_min_exceeds_max"));
    }
    for group in &config.groups {
        if group.name.is_empty() {
            return Err(ValidationError::new("group_name_empty"));
        }
        if group.urls.is_empty() && group.urls_file.is_none() {
            return Err(ValidationError::new("group_without_urls"));
        }
    }
    Ok(())
}

pub(crate) fn default_timeout() -> u64 {
    10
}

pub(crate) fn default_max_urls() -> usize {
    10
}

pub(crate) fn default_year() -> String {
    DEFAULT_FRESHNESS_YEAR.to_string()
}

fn default_table_name() -> String {
    "page_reports".to_string()
}
