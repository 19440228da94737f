//! HTTP handlers: health checks, example endpoint, API document.

pub mod example;
pub mod health;

use crate::state::AppState;
use axum::{extract::State, Json};

/// GET <doc.route>: OpenAPI document.
pub async fn openapi_json(State(state): State<AppState>) -> Json<utoipa::openapi::OpenApi> {
    Json(crate::openapi::document(&state.settings))
}
