//! Startup wiring: loads the model context and connects the price store.

use crate::application::market_data::DecompositionService;
use crate::application::ml::artifacts::ModelContext;
use crate::application::ml::prediction_service::PredictionService;
use crate::config::{Config, PriceSource};
use crate::domain::ports::PriceStore;
use crate::infrastructure::{CsvPriceStore, Database, InMemoryPriceStore, SqlitePriceStore};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

/// Everything a request handler needs, built once at startup.
#[derive(Clone)]
pub struct AppServices {
    pub model: Arc<ModelContext>,
    pub predictions: PredictionService,
    pub decomposition: DecompositionService,
    pub default_symbol: String,
}

impl AppServices {
    pub fn new(
        model: Arc<ModelContext>,
        price_store: Arc<dyn PriceStore>,
        config: &Config,
    ) -> Self {
        Self {
            predictions: PredictionService::new(model.clone()),
            decomposition: DecompositionService::new(price_store, config.prices.settings()),
            default_symbol: config.prices.default_symbol.clone(),
            model,
        }
    }
}

pub struct ServiceBootstrap;

impl ServiceBootstrap {
    pub async fn init(config: &Config) -> Result<AppServices> {
        let paths = config.artifacts.paths();
        let model = ModelContext::load(paths).context("Failed to load model artifacts")?;
        info!("Features: {}", model.features().len());

        let price_store = Self::price_store(&config.prices.source).await?;
        info!("Price source: {}", price_store.describe());

        Ok(AppServices::new(Arc::new(model), price_store, config))
    }

    async fn price_store(source: &PriceSource) -> Result<Arc<dyn PriceStore>> {
        Ok(match source {
            PriceSource::Sqlite(url) => {
                let db = Database::new(url)
                    .await
                    .context("Failed to initialize price database")?;
                Arc::new(SqlitePriceStore::new(db.pool.clone()))
            }
            PriceSource::Csv(path) => {
                if !path.exists() {
                    warn!("Price file {} does not exist yet", path.display());
                }
                Arc::new(CsvPriceStore::new(path.clone()))
            }
            PriceSource::Empty => {
                warn!("No price source configured; decomposition will report every symbol as not found");
                Arc::new(InMemoryPriceStore::new())
            }
        })
    }
}
