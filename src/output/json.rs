use super::OutputHandler;
use crate::engine::PageReport;
use crate::error::Result;
use async_trait::async_trait;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Collects every report of a run and writes them as one pretty-printed JSON
/// array on `close`. The file is created up front so a bad path fails early.
pub struct JsonOutput {
    file: Option<File>,
    reports: Vec<PageReport>,
}

impl JsonOutput {
    pub fn new(path: PathBuf) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            file: Some(file),
            reports: Vec::new(),
        })
    }
}

#[async_trait]
impl OutputHandler for JsonOutput {
    async fn write(&mut self, report: &PageReport) -> Result<()> {
        self.reports.push(report.clone());
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        let Some(file) = self.file.take() else {
            return Ok(());
        };
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &self.reports)?;
        writer.flush()?;
        log::info!("Wrote {} page reports", self.reports.len());
        Ok(())
    }
}
