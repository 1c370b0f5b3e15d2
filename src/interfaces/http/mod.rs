//! HTTP interface.
//!
//! Thin axum layer over the prediction and decomposition services. Handlers
//! receive the startup-built [`AppServices`] as router state; no handler
//! mutates it.

mod error;
mod handlers;

pub use error::ApiError;

use crate::application::bootstrap::AppServices;
use axum::Router;
use axum::routing::{get, post};

pub fn router(services: AppServices) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/model-info", get(handlers::model_info))
        .route("/predict", post(handlers::predict))
        .route("/stock/decomposition", get(handlers::decomposition))
        .with_state(services)
}
