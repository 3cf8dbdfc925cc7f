use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use super::ApiJson;
use crate::errors::AppError;
use crate::models::{
    EstimateResult, ImageAnalysis, ImageAnalysisRequest, MaterialRecommendations, ProjectIntake,
    PROJECT_TYPES,
};
use crate::state::AppState;

// GET /api/project-types
pub async fn project_types() -> Json<&'static [&'static str]> {
    Json(PROJECT_TYPES)
}

// POST /api/estimates
pub async fn create_estimate(
    State(state): State<Arc<AppState>>,
    ApiJson(intake): ApiJson<ProjectIntake>,
) -> Result<Json<EstimateResult>, AppError> {
    let estimate = state.pipeline.request_estimate(&intake).await?;
    Ok(Json(estimate))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialsRequest {
    #[serde(default)]
    pub project_type: String,
}

// POST /api/materials
pub async fn recommend_materials(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<MaterialsRequest>,
) -> Result<Json<MaterialRecommendations>, AppError> {
    let recommendations = state
        .pipeline
        .recommend_materials(&payload.project_type)
        .await?;
    Ok(Json(recommendations))
}

// POST /api/analysis
pub async fn analyze_image(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<ImageAnalysisRequest>,
) -> Result<Json<ImageAnalysis>, AppError> {
    let analysis = state
        .pipeline
        .analyze_image(&payload.image, &payload.context)
        .await?;
    Ok(Json(analysis))
}
