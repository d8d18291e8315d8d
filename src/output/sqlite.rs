use super::{OutputHandler, flatten};
use crate::engine::PageReport;
use crate::error::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;
use std::path::PathBuf;

/// One row per report, every column stored as TEXT.
pub struct SqliteOutput {
    pool: SqlitePool,
    table_name: String,
    initialized: bool,
}

impl SqliteOutput {
    pub async fn new(path: PathBuf, table_name: String) -> Result<Self> {
        let conn_str = format!("sqlite:{}?mode=rwc", path.display());
        let pool = SqlitePool::connect(&conn_str).await?;

        Ok(Self {
            pool,
            table_name,
            initialized: false,
        })
    }

    async fn ensure_table(&mut self, columns: &[(String, String)]) -> Result<()> {
        if self.initialized {
            return Ok(());
        }

        let columns: Vec<_> = columns
            .iter()
            .map(|(name, _)| format!("\"{}\" TEXT", name))
            .collect();

        let query = format!(
            "CREATE TABLE IF NOT EXISTS \"{}\" (id INTEGER PRIMARY KEY, {})",
            self.table_name,
            columns.join(", ")
        );

        sqlx::query(&query).execute(&self.pool).await?;

        self.initialized = true;
        Ok(())
    }
}

#[async_trait]
impl OutputHandler for SqliteOutput {
    async fn write(&mut self, report: &PageReport) -> Result<()> {
        let row = flatten(report);
        self.ensure_table(&row).await?;

        let columns: Vec<_> = row.iter().map(|(name, _)| format!("\"{}\"", name)).collect();
        let placeholders: Vec<_> = (1..=row.len()).map(|i| format!("?{}", i)).collect();

        let query = format!(
            "INSERT INTO \"{}\" ({}) VALUES ({})",
            self.table_name,
            columns.join(", "),
            placeholders.join(", ")
        );

        let mut q = sqlx::query(&query);
        for (_, value) in row {
            q = q.bind(value);
        }

        q.execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}
