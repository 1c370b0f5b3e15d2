pub mod artifacts;
pub mod forest;
pub mod prediction_service;
pub mod predictor;
pub mod scaler;
pub mod smartcore_predictor;
pub mod vectorizer;
