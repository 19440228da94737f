//! Example endpoint wired to the container's business logic.

use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DoResponse {
    pub status: String,
}

/// Do something
#[utoipa::path(
    get,
    path = "/do",
    tag = "example",
    responses(
        (status = 200, description = "Business logic ran", body = DoResponse),
        (status = 503, description = "Database pool not started")
    )
)]
pub async fn do_something(State(state): State<AppState>) -> Result<Json<DoResponse>, AppError> {
    state.ctx.business_logic().await?;
    Ok(Json(DoResponse { status: "ok".into() }))
}
