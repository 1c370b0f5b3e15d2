//! Model artifact locations.

use crate::application::ml::artifacts::ArtifactPaths;
use std::path::PathBuf;

pub const DEFAULT_MODEL_FILE: &str = "rf_binary_classifier.json";
pub const DEFAULT_SCALER_FILE: &str = "scaler.json";
pub const DEFAULT_METADATA_FILE: &str = "model_metadata.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactEnvConfig {
    pub base_dir: PathBuf,
    pub models_dir: PathBuf,
    pub model_file: String,
    pub scaler_file: String,
    pub metadata_file: String,
}

impl ArtifactEnvConfig {
    pub fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_dir = lookup("MODELS_BASE_DIR")
            .map(PathBuf::from)
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));
        let models_dir = lookup("MODELS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| base_dir.join("models"));

        Self {
            base_dir,
            models_dir,
            model_file: lookup("MODEL_FILE").unwrap_or_else(|| DEFAULT_MODEL_FILE.to_string()),
            scaler_file: lookup("SCALER_FILE").unwrap_or_else(|| DEFAULT_SCALER_FILE.to_string()),
            metadata_file: lookup("METADATA_FILE")
                .unwrap_or_else(|| DEFAULT_METADATA_FILE.to_string()),
        }
    }

    pub fn paths(&self) -> ArtifactPaths {
        ArtifactPaths::new(
            self.base_dir.clone(),
            self.models_dir.clone(),
            &self.model_file,
            &self.scaler_file,
            &self.metadata_file,
        )
    }
}
