use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::RequestId;
use crate::models::{Recommendation, Strategy, UserProfile};
use crate::services::FeedbackEvent;

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendParams {
    pub k: Option<usize>,
    pub approach: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub user_id: Option<String>,
    pub recommendations: Vec<Recommendation>,
    pub approach: String,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub user_id: Option<String>,
    pub program_id: String,
    /// clicked, accepted, or rejected
    pub feedback_type: String,
    pub session_id: Option<String>,
}

// Handlers

/// Service banner
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Study Program Recommendation API",
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Detailed health check with artifact capability probe
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let caps = state.engine.capabilities();
    Json(json!({
        "status": "healthy",
        "models_loaded": caps.loaded,
        "tfidf_available": caps.tfidf,
        "cf_model_available": caps.factor_model,
        "programs_loaded": caps.programs,
    }))
}

/// Generates program recommendations for a user profile
///
/// The approach string is validated before any scoring; malformed approaches
/// are rejected with 400.
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<RecommendParams>,
    Json(profile): Json<UserProfile>,
) -> AppResult<Json<RecommendationResponse>> {
    let k = params.k.unwrap_or(state.default_k);
    if k == 0 {
        return Err(AppError::InvalidInput(
            "k must be a positive integer".to_string(),
        ));
    }

    let approach = params.approach.as_deref().unwrap_or("hybrid");
    let strategy = Strategy::parse(approach).ok_or_else(|| {
        AppError::InvalidInput(format!("Unknown approach '{}'.", approach.trim().to_lowercase()))
    })?;

    tracing::info!(
        request_id = %request_id,
        approach = %strategy,
        k,
        "processing recommendation request"
    );

    let recommendations = state.engine.recommend(strategy, &profile, k)?;

    Ok(Json(RecommendationResponse {
        user_id: profile.user_id,
        recommendations,
        approach: strategy.to_string(),
    }))
}

/// Logs user feedback on a recommendation
pub async fn submit_feedback(
    State(state): State<AppState>,
    Json(request): Json<FeedbackRequest>,
) -> AppResult<Json<Value>> {
    let event = FeedbackEvent::new(
        request.user_id,
        request.program_id.clone(),
        request.feedback_type.clone(),
        request.session_id,
    );
    state.feedback.record(event).await?;

    Ok(Json(json!({
        "message": "Feedback recorded successfully",
        "feedback_type": request.feedback_type,
        "program_id": request.program_id,
    })))
}

/// Lists all programs in the catalog
pub async fn get_programs(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let programs = state.engine.programs()?;
    Ok(Json(json!({
        "count": programs.len(),
        "programs": programs,
    })))
}
