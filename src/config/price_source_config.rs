//! Price history source for the decomposition endpoint.

use crate::application::market_data::decomposition::{
    DEFAULT_LOOKBACK, DEFAULT_WINDOW, DecompositionSettings,
};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Where raw daily closes are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceSource {
    Sqlite(String),
    Csv(PathBuf),
    /// No source configured; every symbol is reported as not found
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceSourceEnvConfig {
    pub source: PriceSource,
    pub lookback: usize,
    pub window: usize,
    pub default_symbol: String,
}

impl PriceSourceEnvConfig {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let source = match (lookup("PRICE_DATABASE_URL"), lookup("PRICE_CSV_PATH")) {
            (Some(_), Some(_)) => {
                anyhow::bail!("Set only one of PRICE_DATABASE_URL and PRICE_CSV_PATH")
            }
            (Some(url), None) => PriceSource::Sqlite(url),
            (None, Some(path)) => PriceSource::Csv(PathBuf::from(path)),
            (None, None) => PriceSource::Empty,
        };

        let lookback = parse_usize(lookup, "DECOMPOSITION_LOOKBACK", DEFAULT_LOOKBACK)?;
        let window = parse_usize(lookup, "DECOMPOSITION_WINDOW", DEFAULT_WINDOW)?;
        if window < 2 {
            anyhow::bail!("DECOMPOSITION_WINDOW must be at least 2, got {}", window);
        }
        if lookback <= window {
            anyhow::bail!(
                "DECOMPOSITION_LOOKBACK ({}) must exceed DECOMPOSITION_WINDOW ({})",
                lookback,
                window
            );
        }

        Ok(Self {
            source,
            lookback,
            window,
            default_symbol: lookup("DECOMPOSITION_DEFAULT_SYMBOL")
                .unwrap_or_else(|| "AAPL".to_string()),
        })
    }

    pub fn settings(&self) -> DecompositionSettings {
        DecompositionSettings {
            lookback: self.lookback,
            window: self.window,
        }
    }
}

fn parse_usize<F>(lookup: &F, key: &str, default: usize) -> Result<usize>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .parse::<usize>()
            .with_context(|| format!("Failed to parse {} '{}'", key, raw)),
        None => Ok(default),
    }
}
