use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::{ApiError, AppState};
use crate::domain::pricing::FeatureVector;
use crate::domain::sentiment::{SentimentLabel, SentimentScores};

#[derive(Debug, Serialize)]
pub(super) struct HealthResponse {
    status: &'static str,
}

pub(super) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

#[derive(Debug, Deserialize)]
pub(super) struct PredictPriceRequest {
    features: FeatureVector,
}

#[derive(Debug, Serialize)]
pub(super) struct PredictPriceResponse {
    predicted_price: f64,
}

pub(super) async fn predict_price(
    State(state): State<AppState>,
    Json(request): Json<PredictPriceRequest>,
) -> Result<Json<PredictPriceResponse>, ApiError> {
    let predicted_price = state.pricing.read().await.predict(&request.features)?;
    Ok(Json(PredictPriceResponse { predicted_price }))
}

#[derive(Debug, Deserialize)]
pub(super) struct AnalyzeSentimentRequest {
    text: String,
}

#[derive(Debug, Serialize)]
pub(super) struct AnalyzeSentimentResponse {
    text: String,
    scores: SentimentScores,
    label: SentimentLabel,
}

pub(super) async fn analyze_sentiment(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeSentimentRequest>,
) -> Json<AnalyzeSentimentResponse> {
    let scores = state.sentiment.analyze(&request.text);
    let label = scores.label();
    Json(AnalyzeSentimentResponse {
        text: request.text,
        scores,
        label,
    })
}
