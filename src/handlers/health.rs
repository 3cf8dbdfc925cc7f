use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[derive(Serialize)]
pub struct ProviderStatus {
    provider: String,
    reachable: bool,
}

// GET /api/provider/status
pub async fn provider_status(State(state): State<Arc<AppState>>) -> Json<ProviderStatus> {
    let reachable = state.pipeline.check_connection().await;
    Json(ProviderStatus {
        provider: state.pipeline.provider_name().to_string(),
        reachable,
    })
}
