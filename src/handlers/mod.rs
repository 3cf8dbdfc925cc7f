pub mod estimate;
pub mod health;

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, FromRequest};
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::errors::AppError;
use crate::state::AppState;

/// Photos travel base64-encoded inside JSON bodies.
const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// `Json` whose rejection answers with the same `{"error","kind"}` body as
/// every other failure.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

pub fn router(state: Arc<AppState>) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_allow_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health::health))
        .route("/api/provider/status", get(health::provider_status))
        .route("/api/project-types", get(estimate::project_types))
        .route("/api/estimates", post(estimate::create_estimate))
        .route("/api/materials", post(estimate::recommend_materials))
        .route("/api/analysis", post(estimate::analyze_image))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
