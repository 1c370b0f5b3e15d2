#![allow(dead_code)]

use rustpredict::application::ml::artifacts::ArtifactPaths;
use rustpredict::domain::market::PriceBar;
use rustpredict::domain::ml::feature_registry::FEATURE_SCHEMA;
use chrono::{Days, NaiveDate};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

static FIXTURE_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub const RSI_SLOT: usize = 5;

/// Example request body used throughout the tests.
pub fn example_payload() -> Value {
    json!({
        "Return_1d": 0.012,
        "Return_5d": 0.045,
        "Return_10d": 0.078,
        "SMA_Cross_5_20": 1,
        "SMA_Cross_10_50": 0,
        "RSI_14": 58.3,
        "BB_Position": 0.62,
        "MACD_Diff": 0.13,
        "Volume_Ratio": 1.2,
        "Volatility_5d": 0.012,
        "Volatility_20d": 0.015,
        "Daily_Range": 3.2,
        "Daily_Range_MA": 2.1,
        "Trend": 1,
        "Noise": 0.003,
        "Volatility": 0.012
    })
}

pub fn schema_names() -> Vec<String> {
    FEATURE_SCHEMA.iter().map(|f| f.name.to_string()).collect()
}

pub fn metadata_json() -> Value {
    json!({
        "features": schema_names(),
        "model_type": "RandomForestClassifier",
        "training_date": "2026-01-11T00:45:50",
        "n_estimators": 2
    })
}

/// Identity scaler so raw RSI values reach the forest unchanged.
pub fn scaler_json(n: usize) -> Value {
    json!({ "mean": vec![0.0; n], "scale": vec![1.0; n] })
}

/// Two stumps on RSI_14: above 50 the ensemble gives 0.8 "up", otherwise 0.3.
pub fn forest_json() -> Value {
    json!({
        "n_features": 16,
        "trees": [
            { "nodes": [
                { "feature": RSI_SLOT, "threshold": 50.0, "left": 1, "right": 2 },
                { "value": [6.0, 4.0] },
                { "value": [1.0, 9.0] }
            ]},
            { "nodes": [
                { "feature": RSI_SLOT, "threshold": 50.0, "left": 1, "right": 2 },
                { "value": [8.0, 2.0] },
                { "value": [3.0, 7.0] }
            ]}
        ]
    })
}

/// A fresh, empty models directory under the system temp dir.
pub struct Fixture {
    pub base_dir: PathBuf,
    pub models_dir: PathBuf,
}

impl Fixture {
    pub fn new(name: &str) -> Self {
        let id = FIXTURE_COUNTER.fetch_add(1, Ordering::SeqCst);
        let base_dir = std::env::temp_dir().join(format!(
            "rustpredict-{}-{}-{}",
            name,
            std::process::id(),
            id
        ));
        let models_dir = base_dir.join("models");
        let _ = fs::remove_dir_all(&base_dir);
        fs::create_dir_all(&models_dir).unwrap();
        Self {
            base_dir,
            models_dir,
        }
    }

    /// Fixture with all three default artifacts written.
    pub fn complete(name: &str) -> Self {
        let fixture = Self::new(name);
        fixture.write("model.json", &forest_json());
        fixture.write("scaler.json", &scaler_json(16));
        fixture.write("metadata.json", &metadata_json());
        fixture
    }

    pub fn write(&self, file: &str, value: &Value) {
        self.write_raw(file, &serde_json::to_string_pretty(value).unwrap());
    }

    pub fn write_raw(&self, file: &str, contents: &str) {
        fs::write(self.models_dir.join(file), contents).unwrap();
    }

    pub fn paths(&self) -> ArtifactPaths {
        ArtifactPaths::new(
            &self.base_dir,
            &self.models_dir,
            "model.json",
            "scaler.json",
            "metadata.json",
        )
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.models_dir.join(file)
    }

    pub fn base(&self) -> &Path {
        &self.base_dir
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.base_dir);
    }
}

/// Smooth synthetic daily closes starting 2022-01-03.
pub fn price_history(n: usize) -> Vec<PriceBar> {
    let start = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
    (0..n)
        .map(|i| {
            let close = 150.0 + (i as f64 / 7.0).sin() * 8.0 + i as f64 * 0.1;
            PriceBar::new(start + Days::new(i as u64), close)
        })
        .collect()
}
