use super::error::ApiError;
use crate::application::bootstrap::AppServices;
use crate::application::ml::artifacts::{HealthReport, ModelInfo};
use crate::domain::market::DecompositionSeries;
use crate::domain::ml::prediction::{PredictionInput, PredictionResult};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "ML prediction API is online",
        "status": "running",
        "endpoints": {
            "/predict": "POST - Predict market direction",
            "/health": "GET - Service status",
            "/model-info": "GET - Model information",
            "/stock/decomposition": "GET - Trend/noise/volatility decomposition (?symbol=)"
        }
    }))
}

pub async fn health(State(services): State<AppServices>) -> Json<HealthReport> {
    Json(services.model.health())
}

pub async fn model_info(State(services): State<AppServices>) -> Json<ModelInfo> {
    Json(services.model.info())
}

pub async fn predict(
    State(services): State<AppServices>,
    payload: Result<Json<PredictionInput>, JsonRejection>,
) -> Result<Json<PredictionResult>, ApiError> {
    let Json(input) = payload?;
    let result = services.predictions.predict(&input)?;
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct DecompositionQuery {
    symbol: Option<String>,
}

pub async fn decomposition(
    State(services): State<AppServices>,
    Query(query): Query<DecompositionQuery>,
) -> Result<Json<DecompositionSeries>, ApiError> {
    let symbol = query
        .symbol
        .unwrap_or_else(|| services.default_symbol.clone());
    let series = services.decomposition.decompose(&symbol).await?;
    info!("Decomposition for {}: {} points", symbol, series.data.len());
    Ok(Json(series))
}
