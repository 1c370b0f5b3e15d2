use super::artifacts::ModelContext;
use super::vectorizer::vectorize;
use crate::domain::errors::PredictionError;
use crate::domain::ml::prediction::{PredictionInput, PredictionResult};
use std::sync::Arc;
use tracing::debug;

/// Validates, vectorizes, scales and classifies a single request.
#[derive(Clone)]
pub struct PredictionService {
    context: Arc<ModelContext>,
}

impl PredictionService {
    pub fn new(context: Arc<ModelContext>) -> Self {
        Self { context }
    }

    pub fn predict(&self, input: &PredictionInput) -> Result<PredictionResult, PredictionError> {
        // Bounds are checked before the model or scaler are touched
        input.validate()?;

        let vector = vectorize(input.named_values(), self.context.features());
        let scaled = self
            .context
            .scaler()
            .transform(vector.as_slice())
            .map_err(PredictionError::Inference)?;

        let model = self.context.model();
        let class = model.predict(&scaled).map_err(PredictionError::Inference)?;
        let probability_up = model
            .predict_proba(&scaled)
            .map_err(PredictionError::Inference)?;

        if !(0.0..=1.0).contains(&probability_up) {
            return Err(PredictionError::Inference(format!(
                "Model returned probability {} outside [0, 1]",
                probability_up
            )));
        }
        if class > 1 {
            return Err(PredictionError::Inference(format!(
                "Model returned class {}, expected 0 or 1",
                class
            )));
        }

        let result = PredictionResult::new(class, probability_up);
        debug!(
            "Prediction: {} (p_up={:.4})",
            result.prediction_label.label(),
            result.probability_up
        );
        Ok(result)
    }
}
