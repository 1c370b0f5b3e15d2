use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// An artifact that was expected on disk but could not be found.
#[derive(Debug, Clone)]
pub struct MissingArtifact {
    pub name: &'static str,
    pub path: PathBuf,
}

/// Fatal errors raised while loading model artifacts. Any of these prevents serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(
        "Artifact files not found:\n{}\n\nBase directory: {}\nModels directory: {}\nCurrent directory: {}",
        format_missing(.missing),
        .base_dir.display(),
        .models_dir.display(),
        .current_dir.display()
    )]
    ArtifactMissing {
        missing: Vec<MissingArtifact>,
        base_dir: PathBuf,
        models_dir: PathBuf,
        current_dir: PathBuf,
    },

    #[error("Failed to read {name} artifact at {}: {source}", .path.display())]
    ArtifactUnreadable {
        name: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid {name} artifact at {}: {reason}", .path.display())]
    ArtifactInvalid {
        name: &'static str,
        path: PathBuf,
        reason: String,
    },

    #[error("{component} expects {actual} features but metadata lists {expected}")]
    FeatureMismatch {
        component: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Feature '{name}' appears more than once in metadata")]
    DuplicateFeature { name: String },
}

fn format_missing(missing: &[MissingArtifact]) -> String {
    missing
        .iter()
        .map(|m| format!("{}: {}", m.name, m.path.display()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A single field-level constraint violation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Client-caused input error. Detected before any inference work.
#[derive(Debug, Clone, PartialEq, Error)]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn new(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }

    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .violations
            .iter()
            .map(|v| format!("{}: {}", v.field, v.message))
            .collect();
        write!(f, "Invalid input ({})", parts.join("; "))
    }
}

/// Errors surfaced by the prediction path.
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("{0}")]
    Inference(String),
}

/// Errors surfaced by the decomposition path.
#[derive(Debug, Error)]
pub enum DecompositionError {
    #[error("No price data found for symbol {symbol}")]
    NotFound { symbol: String },

    #[error("Price store failure: {0}")]
    Store(String),

    #[error("Decomposition failed: {0}")]
    Computation(String),
}
