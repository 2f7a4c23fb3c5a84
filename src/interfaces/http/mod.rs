mod handlers;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

use crate::application::pricing::PricingModel;
use crate::domain::errors::PricingError;
use crate::infrastructure::sentiment::SentimentAnalyzer;

/// Shared per-process state behind the router.
///
/// The pricing model sits behind a read-write lock: prediction handlers
/// take read guards so concurrent requests proceed in parallel, while a
/// writer (retraining or artifact reload) gets exclusive access instead
/// of racing in-flight predictions.
#[derive(Clone)]
pub struct AppState {
    pub pricing: Arc<RwLock<PricingModel>>,
    pub sentiment: Arc<SentimentAnalyzer>,
}

impl AppState {
    pub fn new(pricing: PricingModel) -> Self {
        Self {
            pricing: Arc::new(RwLock::new(pricing)),
            sentiment: Arc::new(SentimentAnalyzer::new()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
        }
    }
}

impl From<PricingError> for ApiError {
    fn from(err: PricingError) -> Self {
        let code = match &err {
            PricingError::NotTrained => "model_not_trained",
            PricingError::SchemaMismatch { .. } => "schema_mismatch",
            _ => {
                tracing::error!(error = %err, "pricing request failed");
                "internal_error"
            }
        };
        ApiError::new(code, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "model_not_trained" => StatusCode::SERVICE_UNAVAILABLE,
            "schema_mismatch" => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/predict_price", post(handlers::predict_price))
        .route("/analyze_sentiment", post(handlers::analyze_sentiment))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_trained_maps_to_service_unavailable() {
        let response = ApiError::from(PricingError::NotTrained).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn schema_mismatch_maps_to_unprocessable_entity() {
        let err = PricingError::SchemaMismatch {
            expected: "area".to_string(),
            actual: "floors".to_string(),
        };
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn unknown_codes_map_to_internal_error() {
        let response = ApiError::new("something_else", "boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_body_shape() {
        let err = ApiError::new("model_not_trained", "model has not been trained or loaded");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"code\":\"model_not_trained\""));
    }
}
