use crate::config::schema::{
    AnalysisConfig, DelayConfig, GroupConfig, OutputConfig, default_max_urls, default_timeout,
    default_year,
};
use crate::engine::{AnalysisEngine, parse_url_list};
use crate::error::{Error, Result};
use crate::extract::FeatureExtractor;
use crate::fetch::Fetcher;
use crate::output::{
    OutputHandler, console::ConsoleOutput, csv::CsvOutput, json::JsonOutput, sqlite::SqliteOutput,
};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use validator::Validate;

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<AnalysisConfig> {
        let path = path.as_ref();
        let mut visited = HashSet::new();
        Self::load_with_inheritance(path, &mut visited, false)
    }

    fn load_with_inheritance(
        path: &Path,
        visited: &mut HashSet<PathBuf>,
        is_parent_load: bool,
    ) -> Result<AnalysisConfig> {
        let path = fs::canonicalize(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

        if visited.contains(&path) {
            return Err(Error::Config(format!(
                "Circular inheritance detected involving {}",
                path.display()
            )));
        }
        visited.insert(path.clone());

        let dir = path.parent().ok_or_else(|| {
            Error::Config(format!(
                "Cannot determine parent directory for {}",
                path.display()
            ))
        })?;

        let mut config = Self::load_file(&path)?;
        for group in &mut config.groups {
            if let Some(file) = group.urls_file.take() {
                group.urls_file = Some(dir.join(file).display().to_string());
            }
        }

        let final_config = if let Some(parent_path_str) = &config.extends {
            let parent_config =
                Self::load_with_inheritance(&dir.join(parent_path_str), visited, true)?;
            Self::merge_configs(parent_config, config)
        } else {
            config
        };

        if !is_parent_load {
            final_config.validate()?;
        }

        Ok(final_config)
    }

    fn load_file(path: &Path) -> Result<AnalysisConfig> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(serde_json::from_str(&content)?),
            Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&content)?),
            Some("toml") => Ok(toml::from_str(&content)?),
            _ => Err(Error::Config(format!(
                "Unsupported file extension: {}",
                path.display()
            ))),
        }
    }

    /// Child values win wherever they differ from the defaults.
    fn merge_configs(mut parent: AnalysisConfig, child: AnalysisConfig) -> AnalysisConfig {
        if !child.name.is_empty() {
            parent.name = child.name;
        }
        if !child.groups.is_empty() {
            parent.groups = child.groups;
        }
        if child.timeout_secs != default_timeout() {
            parent.timeout_secs = child.timeout_secs;
        }
        if child.max_urls != default_max_urls() {
            parent.max_urls = child.max_urls;
        }
        if child.stealth_delay {
            parent.stealth_delay = true;
        }
        if child.pre_request_delay_ms != DelayConfig::default() {
            parent.pre_request_delay_ms = child.pre_request_delay_ms;
        }
        if child.freshness_year != default_year() {
            parent.freshness_year = child.freshness_year;
        }
        if child.output.is_some() {
            parent.output = child.output;
        }

        parent.extends = None;
        parent
    }

    /// Inline URLs followed by the `urls_file` lines, capped at `max_urls`.
    pub fn group_urls(config: &AnalysisConfig, group: &GroupConfig) -> Result<Vec<String>> {
        let mut text = group.urls.join("\n");
        if let Some(file) = &group.urls_file {
            let listed = fs::read_to_string(file)
                .map_err(|e| Error::Config(format!("{}: {}", file, e)))?;
            text.push('\n');
            text.push_str(&listed);
        }
        Ok(parse_url_list(&text, config.max_urls))
    }

    pub fn create_engine(config: &AnalysisConfig) -> AnalysisEngine {
        let fetcher = Fetcher::builder()
            .delay(config.pre_request_delay_ms.into())
            .build();
        AnalysisEngine::new(
            fetcher,
            FeatureExtractor::new(config.freshness_year.clone()),
            Duration::from_secs(config.timeout_secs),
        )
        .with_stealth_delay(config.stealth_delay)
    }

    pub async fn create_output(
        config: &AnalysisConfig,
        multi: Option<Arc<indicatif::MultiProgress>>,
    ) -> Result<Box<dyn OutputHandler>> {
        let handler: Box<dyn OutputHandler> = match &config.output {
            None | Some(OutputConfig::Console) => Box::new(ConsoleOutput::new(multi)),
            Some(OutputConfig::Json { path }) => Box::new(JsonOutput::new(PathBuf::from(path))?),
            Some(OutputConfig::Csv { path }) => Box::new(CsvOutput::new(PathBuf::from(path))?),
            Some(OutputConfig::Sqlite { path, table }) => {
                Box::new(SqliteOutput::new(PathBuf::from(path), table.clone()).await?)
            }
        };
        Ok(handler)
    }
}
