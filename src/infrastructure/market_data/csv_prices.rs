use crate::domain::market::PriceBar;
use crate::domain::ports::PriceStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct PriceRecord {
    ticker: String,
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Close")]
    close: f64,
}

/// Price store reading a `ticker,Date,Close` CSV file.
///
/// The file is re-read on every fetch so updates on disk are picked up without a restart.
pub struct CsvPriceStore {
    path: PathBuf,
}

impl CsvPriceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_symbol(path: &Path, symbol: &str, limit: usize) -> Result<Vec<PriceBar>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .with_context(|| format!("Failed to open price file {}", path.display()))?;

        let mut bars = Vec::new();
        for (line, record) in reader.deserialize::<PriceRecord>().enumerate() {
            let record =
                record.with_context(|| format!("Invalid price record at row {}", line + 1))?;
            if record.ticker == symbol {
                bars.push(PriceBar::new(record.date, record.close));
            }
        }

        bars.sort_by_key(|b| b.date);
        let skip = bars.len().saturating_sub(limit);
        Ok(bars.split_off(skip))
    }
}

#[async_trait]
impl PriceStore for CsvPriceStore {
    async fn fetch_recent(&self, symbol: &str, limit: usize) -> Result<Vec<PriceBar>> {
        let path = self.path.clone();
        let symbol = symbol.to_string();
        tokio::task::spawn_blocking(move || Self::read_symbol(&path, &symbol, limit))
            .await
            .context("Price file reader task failed")?
    }

    fn describe(&self) -> String {
        format!("csv ({})", self.path.display())
    }
}
