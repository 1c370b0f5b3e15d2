//! Model artifact loading.
//!
//! Three co-versioned files make up a deployable model: the classifier, the
//! scaler fitted alongside it, and a JSON metadata document listing the
//! ordered feature names. All three are loaded once at startup into a
//! [`ModelContext`], which is then shared read-only by every request.

use super::forest::ForestClassifier;
use super::predictor::{BinaryClassifier, FeatureScaler};
use super::scaler::StandardScaler;
use super::smartcore_predictor::SmartCorePredictor;
use crate::domain::errors::{MissingArtifact, StartupError};
use crate::domain::ml::feature_registry::FeatureSpec;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Resolved locations of the three model artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub base_dir: PathBuf,
    pub models_dir: PathBuf,
    pub model: PathBuf,
    pub scaler: PathBuf,
    pub metadata: PathBuf,
}

impl ArtifactPaths {
    pub fn new(
        base_dir: impl Into<PathBuf>,
        models_dir: impl Into<PathBuf>,
        model_file: &str,
        scaler_file: &str,
        metadata_file: &str,
    ) -> Self {
        let models_dir = models_dir.into();
        Self {
            base_dir: base_dir.into(),
            model: models_dir.join(model_file),
            scaler: models_dir.join(scaler_file),
            metadata: models_dir.join(metadata_file),
            models_dir,
        }
    }

    /// Fails with every missing artifact listed, not just the first one found.
    pub fn verify(&self) -> Result<(), StartupError> {
        let missing: Vec<MissingArtifact> = [
            ("Model", &self.model),
            ("Scaler", &self.scaler),
            ("Metadata", &self.metadata),
        ]
        .into_iter()
        .filter(|(_, path)| !path.exists())
        .map(|(name, path)| MissingArtifact {
            name,
            path: path.clone(),
        })
        .collect();

        if missing.is_empty() {
            return Ok(());
        }

        Err(StartupError::ArtifactMissing {
            missing,
            base_dir: self.base_dir.clone(),
            models_dir: self.models_dir.clone(),
            current_dir: std::env::current_dir().unwrap_or_default(),
        })
    }
}

/// Serialization of the model artifact, chosen by the metadata `model_format` field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelFormat {
    #[default]
    RandomForest,
    SmartcoreLogistic,
}

#[derive(Debug, Deserialize)]
struct MetadataFields {
    features: Vec<String>,
    #[serde(default)]
    model_format: ModelFormat,
}

/// Training metadata. The full document is kept so informational fields pass through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelMetadata {
    pub features: Vec<String>,
    pub model_type: Option<Value>,
    pub training_date: Option<Value>,
    pub model_format: ModelFormat,
    pub document: Map<String, Value>,
}

impl ModelMetadata {
    pub fn from_json(value: Value) -> Result<Self, String> {
        let Value::Object(document) = value else {
            return Err("metadata must be a JSON object".to_string());
        };
        let fields: MetadataFields =
            serde_json::from_value(Value::Object(document.clone())).map_err(|e| e.to_string())?;

        Ok(Self {
            features: fields.features,
            model_type: document.get("model_type").cloned(),
            training_date: document.get("training_date").cloned(),
            model_format: fields.model_format,
            document,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub model_loaded: bool,
    pub scaler_loaded: bool,
    pub features_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub model_type: Value,
    pub training_date: Value,
    pub features: Vec<String>,
    pub n_features: usize,
    pub model_path: String,
    pub base_dir: String,
    pub metadata: Map<String, Value>,
}

/// Immutable, process-wide model state.
pub struct ModelContext {
    paths: ArtifactPaths,
    metadata: ModelMetadata,
    features: FeatureSpec,
    model: Arc<dyn BinaryClassifier>,
    scaler: Arc<dyn FeatureScaler>,
}

impl ModelContext {
    /// Assembles a context, checking that scaler and model agree with the metadata feature list.
    pub fn new(
        paths: ArtifactPaths,
        metadata: ModelMetadata,
        model: Arc<dyn BinaryClassifier>,
        scaler: Arc<dyn FeatureScaler>,
    ) -> Result<Self, StartupError> {
        let features = FeatureSpec::new(metadata.features.clone())?;

        if scaler.n_features() != features.len() {
            return Err(StartupError::FeatureMismatch {
                component: "Scaler",
                expected: features.len(),
                actual: scaler.n_features(),
            });
        }
        if model.n_features() != features.len() {
            return Err(StartupError::FeatureMismatch {
                component: "Model",
                expected: features.len(),
                actual: model.n_features(),
            });
        }

        let unused = features.unknown_to_schema();
        if !unused.is_empty() {
            warn!(
                "Model features not provided by the input schema (always 0): {:?}",
                unused
            );
        }

        Ok(Self {
            paths,
            metadata,
            features,
            model,
            scaler,
        })
    }

    /// Verifies and loads all three artifacts from disk.
    pub fn load(paths: ArtifactPaths) -> Result<Self, StartupError> {
        paths.verify()?;

        info!("Loading model from: {}", paths.model.display());

        let metadata_value: Value = read_json(&paths.metadata, "Metadata")?;
        let metadata = ModelMetadata::from_json(metadata_value)
            .map_err(|reason| invalid("Metadata", &paths.metadata, reason))?;

        let scaler: StandardScaler = read_json(&paths.scaler, "Scaler")?;
        scaler
            .check()
            .map_err(|reason| invalid("Scaler", &paths.scaler, reason))?;

        let model: Arc<dyn BinaryClassifier> = match metadata.model_format {
            ModelFormat::RandomForest => {
                let forest: ForestClassifier = read_json(&paths.model, "Model")?;
                forest
                    .check()
                    .map_err(|reason| invalid("Model", &paths.model, reason))?;
                Arc::new(forest)
            }
            ModelFormat::SmartcoreLogistic => {
                let file = open(&paths.model, "Model")?;
                let predictor = SmartCorePredictor::from_reader(BufReader::new(file))
                    .map_err(|reason| invalid("Model", &paths.model, reason))?;
                Arc::new(predictor)
            }
        };

        let context = Self::new(paths, metadata, model, Arc::new(scaler))?;
        info!(
            "Model loaded: {} ({} features)",
            context.model.name(),
            context.features.len()
        );
        Ok(context)
    }

    pub fn features(&self) -> &FeatureSpec {
        &self.features
    }

    pub fn model(&self) -> &dyn BinaryClassifier {
        self.model.as_ref()
    }

    pub fn scaler(&self) -> &dyn FeatureScaler {
        self.scaler.as_ref()
    }

    pub fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }

    pub fn health(&self) -> HealthReport {
        let model_loaded = self.model.is_ready();
        let scaler_loaded = self.scaler.is_ready();
        HealthReport {
            status: if model_loaded && scaler_loaded {
                "healthy"
            } else {
                "degraded"
            },
            model_loaded,
            scaler_loaded,
            features_count: self.features.len(),
        }
    }

    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            model_type: self.metadata.model_type.clone().unwrap_or_else(unknown),
            training_date: self
                .metadata
                .training_date
                .clone()
                .unwrap_or_else(unknown),
            features: self.features.names().to_vec(),
            n_features: self.features.len(),
            model_path: self.paths.model.display().to_string(),
            base_dir: self.paths.base_dir.display().to_string(),
            metadata: self.metadata.document.clone(),
        }
    }
}

fn unknown() -> Value {
    Value::String("Unknown".to_string())
}

fn open(path: &Path, name: &'static str) -> Result<File, StartupError> {
    File::open(path).map_err(|source| StartupError::ArtifactUnreadable {
        name,
        path: path.to_path_buf(),
        source,
    })
}

fn read_json<T: serde::de::DeserializeOwned>(
    path: &Path,
    name: &'static str,
) -> Result<T, StartupError> {
    let file = open(path, name)?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| invalid(name, path, e.to_string()))
}

fn invalid(name: &'static str, path: &Path, reason: String) -> StartupError {
    StartupError::ArtifactInvalid {
        name,
        path: path.to_path_buf(),
        reason,
    }
}
