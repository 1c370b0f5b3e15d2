use crate::domain::market::PriceBar;
use anyhow::Result;
use async_trait::async_trait;

/// Source of raw daily price history, keyed by ticker symbol.
#[async_trait]
pub trait PriceStore: Send + Sync {
    /// Returns at most `limit` of the most recent bars for `symbol`, ordered by date ascending.
    /// An unknown symbol yields an empty vector, not an error.
    async fn fetch_recent(&self, symbol: &str, limit: usize) -> Result<Vec<PriceBar>>;

    /// Short description used in startup logs
    fn describe(&self) -> String;
}
