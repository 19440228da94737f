//! Liveness and readiness endpoints.

use crate::state::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LivenessResponse {
    pub status: String,
}

/// Check if the server is running
#[utoipa::path(
    get,
    path = "/liveness",
    tag = "default",
    responses((status = 200, description = "Process is scheduling requests", body = LivenessResponse))
)]
pub async fn liveness() -> Json<LivenessResponse> {
    Json(LivenessResponse { status: "ok".into() })
}

/// Check if the server is ready
///
/// One flag per monitored component. Always 200; callers inspect the flags.
#[utoipa::path(
    get,
    path = "/readiness",
    tag = "default",
    responses((status = 200, description = "Component name to liveness flag", body = BTreeMap<String, bool>))
)]
pub async fn readiness(State(state): State<AppState>) -> Json<BTreeMap<&'static str, bool>> {
    Json(state.ctx.readiness().await)
}
