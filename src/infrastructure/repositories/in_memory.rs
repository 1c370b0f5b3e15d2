//! In-Memory Price Store
//!
//! Thread-safe, in-memory implementation of `PriceStore`. Used in tests and
//! when no external price source is configured, in which case every symbol
//! resolves to "not found".

use crate::domain::market::PriceBar;
use crate::domain::ports::PriceStore;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct InMemoryPriceStore {
    bars: Arc<RwLock<HashMap<String, Vec<PriceBar>>>>,
}

impl InMemoryPriceStore {
    pub fn new() -> Self {
        Self {
            bars: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Replaces the history for `symbol`. Bars are kept sorted by date.
    pub async fn insert(&self, symbol: &str, mut bars: Vec<PriceBar>) {
        bars.sort_by_key(|b| b.date);
        self.bars.write().await.insert(symbol.to_string(), bars);
    }
}

impl Default for InMemoryPriceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceStore for InMemoryPriceStore {
    async fn fetch_recent(&self, symbol: &str, limit: usize) -> Result<Vec<PriceBar>> {
        let bars = self.bars.read().await;
        Ok(bars
            .get(symbol)
            .map(|history| {
                let skip = history.len().saturating_sub(limit);
                history[skip..].to_vec()
            })
            .unwrap_or_default())
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}
