/// Interface for pre-fitted binary classifiers.
///
/// Inputs are already scaled feature vectors in model feature order.
pub trait BinaryClassifier: Send + Sync {
    /// Probability of the positive ("up") class, in [0.0, 1.0]
    fn predict_proba(&self, features: &[f64]) -> Result<f64, String>;

    /// Predicted class (0 or 1). Ties resolve to 0.
    fn predict(&self, features: &[f64]) -> Result<u8, String> {
        let p_up = self.predict_proba(features)?;
        Ok(u8::from(p_up > 1.0 - p_up))
    }

    /// Number of input features the model was fitted on
    fn n_features(&self) -> usize;

    /// Whether the model holds usable fitted state
    fn is_ready(&self) -> bool;

    /// Get model name/type
    fn name(&self) -> &str;
}

/// Interface for pre-fitted feature transforms applied before inference.
pub trait FeatureScaler: Send + Sync {
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, String>;

    fn n_features(&self) -> usize;

    fn is_ready(&self) -> bool;
}
