use super::{OutputHandler, flatten};
use crate::engine::PageReport;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::path::PathBuf;

pub struct CsvOutput {
    writer: csv::Writer<std::fs::File>,
    headers_written: bool,
}

impl CsvOutput {
    pub fn new(path: PathBuf) -> Result<Self> {
        let writer = csv::Writer::from_path(path).map_err(|e| Error::Internal(e.to_string()))?;

        Ok(Self {
            writer,
            headers_written: false,
        })
    }
}

#[async_trait]
impl OutputHandler for CsvOutput {
    async fn write(&mut self, report: &PageReport) -> Result<()> {
        let row = flatten(report);
        if !self.headers_written {
            self.writer
                .write_record(row.iter().map(|(column, _)| column))
                .map_err(|e| Error::Internal(e.to_string()))?;
            self.headers_written = true;
        }

        self.writer
            .write_record(row.iter().map(|(_, value)| value))
            .map_err(|e| Error::Internal(e.to_string()))?;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::tests::sample_report;

    #[tokio::test]
    async fn header_row_then_one_row_per_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut out = CsvOutput::new(path.clone()).unwrap();
        out.write(&sample_report("https://a.com")).await.unwrap();
        out.write(&sample_report("https://b.com")).await.unwrap();
        out.close().await.unwrap();

        let mut reader = csv::Reader::from_path(path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "url");
        assert!(headers.iter().any(|h| h == "html_js_byte_ratio"));
        let rows: Vec<_> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[1][0], "https://b.com");
        assert_eq!(rows[0].len(), headers.len());
    }
}
