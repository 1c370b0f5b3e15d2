use super::predictor::BinaryClassifier;
use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::logistic_regression::LogisticRegression;
use std::io::Read;
use tracing::info;

pub type SmartCoreLogisticModel = LogisticRegression<f64, i32, DenseMatrix<f64>, Vec<i32>>;

/// Binary logistic regression fitted with smartcore and persisted with serde_json.
///
/// The fitted weights are copied out at load time so inference does not
/// allocate matrices per request.
pub struct SmartCorePredictor {
    weights: Vec<f64>,
    intercept: f64,
}

impl SmartCorePredictor {
    pub fn new(weights: Vec<f64>, intercept: f64) -> Self {
        Self { weights, intercept }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, String> {
        let model: SmartCoreLogisticModel = serde_json::from_reader(reader)
            .map_err(|e| format!("Failed to deserialize smartcore model: {}", e))?;
        let predictor = Self::from_model(&model)?;
        info!(
            "Loaded smartcore logistic regression with {} weights",
            predictor.weights.len()
        );
        Ok(predictor)
    }

    pub fn from_model(model: &SmartCoreLogisticModel) -> Result<Self, String> {
        let coefficients = model.coefficients();
        let (rows, cols) = coefficients.shape();
        if rows != 1 {
            return Err(format!(
                "Expected a binary model with 1 coefficient row, found {}",
                rows
            ));
        }

        let weights: Vec<f64> = (0..cols).map(|j| *coefficients.get((0, j))).collect();
        let intercept = *model.intercept().get((0, 0));
        Ok(Self::new(weights, intercept))
    }
}

impl BinaryClassifier for SmartCorePredictor {
    fn predict_proba(&self, features: &[f64]) -> Result<f64, String> {
        if features.len() != self.weights.len() {
            return Err(format!(
                "Model expects {} features, got {}",
                self.weights.len(),
                features.len()
            ));
        }

        let z: f64 = self.intercept
            + self
                .weights
                .iter()
                .zip(features)
                .map(|(w, x)| w * x)
                .sum::<f64>();
        let p = 1.0 / (1.0 + (-z).exp());
        if p.is_finite() {
            Ok(p)
        } else {
            Err(format!("Non-finite probability for logit {}", z))
        }
    }

    fn n_features(&self) -> usize {
        self.weights.len()
    }

    fn is_ready(&self) -> bool {
        !self.weights.is_empty()
    }

    fn name(&self) -> &str {
        "SmartCore Logistic Regression"
    }
}
