use crate::domain::errors::{DecompositionError, FieldViolation, PredictionError};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::{error, warn};

/// Boundary error: every service failure is translated here into a status code and JSON body.
#[derive(Debug)]
pub enum ApiError {
    /// Field-level problems with a request body
    Invalid {
        status: StatusCode,
        violations: Vec<FieldViolation>,
    },
    Prediction(String),
    NotFound(String),
    Internal(String),
}

impl From<PredictionError> for ApiError {
    fn from(err: PredictionError) -> Self {
        match err {
            PredictionError::Invalid(validation) => ApiError::Invalid {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                violations: validation.violations,
            },
            PredictionError::Inference(detail) => ApiError::Prediction(detail),
        }
    }
}

impl From<DecompositionError> for ApiError {
    fn from(err: DecompositionError) -> Self {
        match err {
            DecompositionError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            DecompositionError::Store(_) | DecompositionError::Computation(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        ApiError::Invalid {
            status: rejection.status(),
            violations: vec![FieldViolation::new(offending_field(&message), message)],
        }
    }
}

/// Field named by a body rejection.
///
/// Type errors carry the field path before the first `": "` (e.g.
/// "...target type: Trend: expected an integer, got 0.5"). Missing fields are
/// only named in backticks. Anything else is attributed to the whole body.
fn offending_field(message: &str) -> String {
    let detail = message
        .split_once("target type: ")
        .map_or(message, |(_, rest)| rest);

    if let Some((path, _)) = detail.split_once(": ")
        && !path.is_empty()
        && !path.contains(char::is_whitespace)
    {
        return path.to_string();
    }

    detail
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split_once('`'))
        .map(|(name, _)| name)
        .filter(|name| !name.is_empty())
        .unwrap_or("body")
        .to_string()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Invalid { status, violations } => {
                warn!("Rejected request: {:?}", violations);
                (status, Json(json!({ "detail": violations }))).into_response()
            }
            ApiError::Prediction(detail) => {
                error!("Prediction failed: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": format!("Erro ao fazer predição: {}", detail) })),
                )
                    .into_response()
            }
            ApiError::NotFound(message) => {
                warn!("{}", message);
                (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Internal(message) => {
                error!("{}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": message })),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ValidationError;

    #[test]
    fn test_offending_field_extraction() {
        assert_eq!(
            offending_field("Failed to deserialize the JSON body into the target type: missing field `RSI_14` at line 1 column 2"),
            "RSI_14"
        );
        assert_eq!(
            offending_field("Failed to deserialize the JSON body into the target type: SMA_Cross_5_20: invalid type: floating point `1.5`, expected i64 at line 1 column 80"),
            "SMA_Cross_5_20"
        );
        assert_eq!(
            offending_field("Failed to deserialize the JSON body into the target type: RSI_14: invalid type: string \"58.3\", expected f64 at line 1 column 20"),
            "RSI_14"
        );
        assert_eq!(
            offending_field("Failed to deserialize the JSON body into the target type: invalid type: sequence, expected struct PredictionInput at line 1 column 0"),
            "body"
        );
        assert_eq!(
            offending_field("Failed to parse the request body as JSON: EOF while parsing a value at line 1 column 11"),
            "body"
        );
        assert_eq!(
            offending_field("Expected request with `Content-Type: application/json`"),
            "body"
        );
        assert_eq!(offending_field("EOF while parsing an object"), "body");
    }

    #[test]
    fn test_status_mapping() {
        let invalid: ApiError = PredictionError::Invalid(ValidationError::new(vec![
            FieldViolation::new("RSI_14", "must be between 0 and 100"),
        ]))
        .into();
        assert_eq!(invalid.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);

        let inference: ApiError = PredictionError::Inference("boom".to_string()).into();
        assert_eq!(
            inference.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let not_found: ApiError = DecompositionError::NotFound {
            symbol: "ZZZZ".to_string(),
        }
        .into();
        assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);

        let computation: ApiError = DecompositionError::Computation("empty".to_string()).into();
        assert_eq!(
            computation.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
