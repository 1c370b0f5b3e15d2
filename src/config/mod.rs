//! Configuration module for Rustpredict.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: model artifacts, HTTP server, and price history source.

mod artifact_config;
mod price_source_config;
mod server_config;

pub use artifact_config::{
    ArtifactEnvConfig, DEFAULT_METADATA_FILE, DEFAULT_MODEL_FILE, DEFAULT_SCALER_FILE,
};
pub use price_source_config::{PriceSource, PriceSourceEnvConfig};
pub use server_config::ServerEnvConfig;

use anyhow::{Context, Result};
use std::env;

/// Main application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub artifacts: ArtifactEnvConfig,
    pub server: ServerEnvConfig,
    pub prices: PriceSourceEnvConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup (environment, test fixtures).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let artifacts = ArtifactEnvConfig::from_lookup(&lookup);
        let server = ServerEnvConfig::from_lookup(&lookup).context("Failed to load server config")?;
        let prices = PriceSourceEnvConfig::from_lookup(&lookup)
            .context("Failed to load price source config")?;

        Ok(Self {
            artifacts,
            server,
            prices,
        })
    }
}
