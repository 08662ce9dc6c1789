use crate::api::AppState;
use crate::error::Result;
use crate::ml::{CategoricalField, EncodingEntry, ModelMetadata, ModelType};
use crate::models::*;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;
use validator::Validate;

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    let classifier = state.pipeline.bundle().classifier();
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: classifier.metadata().clone(),
        model_type: classifier.model_type(),
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model: ModelMetadata,
    pub model_type: ModelType,
}

/// Option lists the form offers
pub async fn list_options() -> Json<OptionsResponse> {
    Json(OptionsResponse {
        department: DEPARTMENT_OPTIONS.to_vec(),
        education: EDUCATION_OPTIONS.to_vec(),
        gender: GENDER_OPTIONS.to_vec(),
        recruitment_channel: RECRUITMENT_OPTIONS.to_vec(),
        previous_year_rating: RATING_OPTIONS.to_vec(),
    })
}

#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub department: Vec<&'static str>,
    pub education: Vec<&'static str>,
    pub gender: Vec<&'static str>,
    pub recruitment_channel: Vec<&'static str>,
    pub previous_year_rating: Vec<f64>,
}

/// Department and education code tables
pub async fn list_encodings(State(state): State<AppState>) -> Json<EncodingsResponse> {
    Json(EncodingsResponse {
        department: state.pipeline.encodings(CategoricalField::Department),
        education: state.pipeline.encodings(CategoricalField::Education),
    })
}

#[derive(Debug, Serialize)]
pub struct EncodingsResponse {
    pub department: Vec<EncodingEntry>,
    pub education: Vec<EncodingEntry>,
}

/// Score one set of employee attributes
pub async fn predict(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RawAttributes>, JsonRejection>,
) -> Result<Json<PredictResponse>> {
    let Json(request) = payload?;
    request.validate()?;

    let verdict = state.pipeline.predict(&request)?;

    tracing::debug!(
        promoted = verdict.promoted,
        confidence = verdict.confidence,
        "Prediction served"
    );

    Ok(Json(PredictResponse::from(verdict)))
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub promoted: bool,
    pub confidence: f64,
    pub confidence_percent: String,
    pub message: String,
}

impl From<Verdict> for PredictResponse {
    fn from(verdict: Verdict) -> Self {
        Self {
            promoted: verdict.promoted,
            confidence: verdict.confidence,
            confidence_percent: verdict.confidence_percent(),
            message: verdict.headline(),
        }
    }
}
