use crate::domain::market::PriceBar;
use crate::domain::ports::PriceStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Row, SqlitePool};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Price store backed by the `daily_prices` table.
pub struct SqlitePriceStore {
    pool: SqlitePool,
}

impl SqlitePriceStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts or replaces bars for `symbol`.
    pub async fn save_bars(&self, symbol: &str, bars: &[PriceBar]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for bar in bars {
            sqlx::query(
                r#"
                INSERT INTO daily_prices (ticker, date, close)
                VALUES (?, ?, ?)
                ON CONFLICT(ticker, date) DO UPDATE SET close = excluded.close
                "#,
            )
            .bind(symbol)
            .bind(bar.date.format(DATE_FORMAT).to_string())
            .bind(bar.close)
            .execute(&mut *tx)
            .await
            .context("Failed to save price bar")?;
        }
        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl PriceStore for SqlitePriceStore {
    async fn fetch_recent(&self, symbol: &str, limit: usize) -> Result<Vec<PriceBar>> {
        let rows = sqlx::query(
            r#"
            SELECT date, close FROM (
                SELECT date, close FROM daily_prices
                WHERE ticker = ?
                ORDER BY date DESC
                LIMIT ?
            ) ORDER BY date ASC
            "#,
        )
        .bind(symbol)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("Failed to fetch prices for {}", symbol))?;

        rows.iter()
            .map(|row| -> Result<PriceBar> {
                let date: String = row.try_get("date")?;
                let close: f64 = row.try_get("close")?;
                let date = NaiveDate::parse_from_str(&date, DATE_FORMAT)
                    .with_context(|| format!("Invalid date '{}' for {}", date, symbol))?;
                Ok(PriceBar::new(date, close))
            })
            .collect()
    }

    fn describe(&self) -> String {
        "sqlite (daily_prices)".to_string()
    }
}
