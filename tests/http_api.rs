mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use common::{Fixture, example_payload, price_history};
use http_body_util::BodyExt;
use rustpredict::application::bootstrap::AppServices;
use rustpredict::application::ml::artifacts::{ArtifactPaths, ModelContext, ModelMetadata};
use rustpredict::application::ml::predictor::BinaryClassifier;
use rustpredict::application::ml::scaler::StandardScaler;
use rustpredict::config::Config;
use rustpredict::infrastructure::InMemoryPriceStore;
use rustpredict::interfaces::http::router;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

async fn app_with(context: ModelContext) -> Router {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();

    let store = InMemoryPriceStore::new();
    store.insert("AAPL", price_history(800)).await;
    store.insert("MSFT", price_history(726)).await;
    store.insert("IPO", price_history(15)).await;

    let config = Config::from_lookup(|_| None).unwrap();
    router(AppServices::new(Arc::new(context), Arc::new(store), &config))
}

async fn app(fixture: &Fixture) -> Router {
    app_with(ModelContext::load(fixture.paths()).unwrap()).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_root_lists_endpoints() {
    let fixture = Fixture::complete("http-root");
    let (status, body) = send(app(&fixture).await, get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
    assert!(body["endpoints"]["/predict"].is_string());
    assert!(body["endpoints"]["/stock/decomposition"].is_string());
}

#[tokio::test]
async fn test_health_reports_loaded_state() {
    let fixture = Fixture::complete("http-health");
    let (status, body) = send(app(&fixture).await, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "status": "healthy",
            "model_loaded": true,
            "scaler_loaded": true,
            "features_count": 16
        })
    );
}

#[tokio::test]
async fn test_model_info_passes_metadata_through() {
    let fixture = Fixture::complete("http-info");
    let (status, body) = send(app(&fixture).await, get("/model-info")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_type"], "RandomForestClassifier");
    assert_eq!(body["training_date"], "2026-01-11T00:45:50");
    assert_eq!(body["n_features"], 16);
    assert_eq!(body["features"].as_array().unwrap().len(), 16);
    assert_eq!(body["features"][5], "RSI_14");
    assert_eq!(body["base_dir"], fixture.base().display().to_string());
    assert_eq!(body["metadata"]["n_estimators"], 2);
}

#[tokio::test]
async fn test_predict_example_payload() {
    let fixture = Fixture::complete("http-predict");
    let app = app(&fixture).await;

    let (status, body) = send(app.clone(), post_json("/predict", &example_payload())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "prediction": 1,
            "prediction_label": "Sobe",
            "probability_up": 0.8,
            "probability_down": 0.2,
            "confidence": 0.8
        })
    );

    let up = body["probability_up"].as_f64().unwrap();
    let down = body["probability_down"].as_f64().unwrap();
    assert!((up + down - 1.0).abs() <= 1e-4);

    // Same loaded model, same input, same answer
    for _ in 0..5 {
        let (_, again) = send(app.clone(), post_json("/predict", &example_payload())).await;
        assert_eq!(again, body);
    }
}

#[tokio::test]
async fn test_predict_low_rsi_goes_down() {
    let fixture = Fixture::complete("http-predict-down");
    let mut payload = example_payload();
    payload["RSI_14"] = json!(35.0);

    let (status, body) = send(app(&fixture).await, post_json("/predict", &payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction"], 0);
    assert_eq!(body["prediction_label"], "Desce");
    assert_eq!(body["probability_up"], 0.3);
    assert_eq!(body["confidence"], 0.7);
}

#[tokio::test]
async fn test_predict_ignores_unknown_fields() {
    let fixture = Fixture::complete("http-extra");
    let mut payload = example_payload();
    payload["Sentiment"] = json!(0.4);

    let (status, body) = send(app(&fixture).await, post_json("/predict", &payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction_label"], "Sobe");
}

#[tokio::test]
async fn test_predict_rejects_out_of_bounds_fields() {
    let fixture = Fixture::complete("http-bounds");
    let mut payload = example_payload();
    payload["RSI_14"] = json!(150);
    payload["Volume_Ratio"] = json!(0);

    let (status, body) = send(app(&fixture).await, post_json("/predict", &payload)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields: Vec<&str> = body["detail"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["RSI_14", "Volume_Ratio"]);
}

#[tokio::test]
async fn test_predict_reports_missing_field() {
    let fixture = Fixture::complete("http-missing-field");
    let mut payload = example_payload();
    payload.as_object_mut().unwrap().remove("RSI_14");

    let (status, body) = send(app(&fixture).await, post_json("/predict", &payload)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["field"], "RSI_14");
}

#[tokio::test]
async fn test_predict_accepts_integral_float_flags() {
    let fixture = Fixture::complete("http-float-flags");
    let mut payload = example_payload();
    payload["SMA_Cross_5_20"] = json!(1.0);
    payload["Trend"] = json!(1.0);

    let (status, body) = send(app(&fixture).await, post_json("/predict", &payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction_label"], "Sobe");
}

#[tokio::test]
async fn test_predict_type_errors_name_the_field() {
    let fixture = Fixture::complete("http-type-errors");
    let app = app(&fixture).await;

    let mut fractional = example_payload();
    fractional["Trend"] = json!(0.5);
    let (status, body) = send(app.clone(), post_json("/predict", &fractional)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["field"], "Trend");

    let mut stringly = example_payload();
    stringly["RSI_14"] = json!("58.3");
    let (status, body) = send(app, post_json("/predict", &stringly)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["field"], "RSI_14");
}

#[tokio::test]
async fn test_predict_rejects_malformed_json() {
    let fixture = Fixture::complete("http-malformed");
    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"RSI_14\": "))
        .unwrap();

    let (status, body) = send(app(&fixture).await, request).await;
    assert!(status.is_client_error());
    assert!(body["detail"].is_array());
}

struct BrokenModel;

impl BinaryClassifier for BrokenModel {
    fn predict_proba(&self, _features: &[f64]) -> Result<f64, String> {
        Err("model state corrupted".to_string())
    }
    fn n_features(&self) -> usize {
        16
    }
    fn is_ready(&self) -> bool {
        true
    }
    fn name(&self) -> &str {
        "broken"
    }
}

#[tokio::test]
async fn test_inference_failure_is_server_error() {
    let metadata = ModelMetadata::from_json(common::metadata_json()).unwrap();
    let scaler = StandardScaler::new(vec![0.0; 16], vec![1.0; 16]).unwrap();
    let context = ModelContext::new(
        ArtifactPaths::new("/srv", "/srv/models", "m.json", "s.json", "meta.json"),
        metadata,
        Arc::new(BrokenModel),
        Arc::new(scaler),
    )
    .unwrap();

    let (status, body) = send(app_with(context).await, post_json("/predict", &example_payload())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["detail"],
        "Erro ao fazer predição: model state corrupted"
    );
}

#[tokio::test]
async fn test_decomposition_for_known_symbol() {
    let fixture = Fixture::complete("http-decomp");
    let (status, body) = send(
        app(&fixture).await,
        get("/stock/decomposition?symbol=MSFT"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["symbol"], "MSFT");
    let data = body["data"].as_array().unwrap();
    // 726 bars minus the 20 without a full trend and return window
    assert_eq!(data.len(), 706);
    assert_eq!(data[0]["date"], "2022-01-23");

    for row in data {
        let close = row["close"].as_f64().unwrap();
        let trend = row["trend"].as_f64().unwrap();
        let noise = row["noise"].as_f64().unwrap();
        assert!((noise - (close - trend)).abs() <= 0.0100001);
        assert!(row["volatility"].as_f64().unwrap() >= 0.0);
    }
}

#[tokio::test]
async fn test_decomposition_defaults_to_aapl_and_caps_history() {
    let fixture = Fixture::complete("http-decomp-default");
    let (status, body) = send(app(&fixture).await, get("/stock/decomposition")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["symbol"], "AAPL");
    // Only the latest 726 of 800 stored bars are used
    assert_eq!(body["data"].as_array().unwrap().len(), 706);
}

#[tokio::test]
async fn test_decomposition_unknown_symbol_is_not_found() {
    let fixture = Fixture::complete("http-decomp-404");
    let (status, body) = send(
        app(&fixture).await,
        get("/stock/decomposition?symbol=NOPE"),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("NOPE"));
}

#[tokio::test]
async fn test_decomposition_short_history_is_server_error() {
    let fixture = Fixture::complete("http-decomp-short");
    let (status, body) = send(
        app(&fixture).await,
        get("/stock/decomposition?symbol=IPO"),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}
