//! Common routes: liveness, readiness, API document.

use crate::handlers::health::{liveness, readiness};
use crate::handlers::openapi_json;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn common_routes(state: AppState) -> Router {
    let doc_route = state.settings.doc.route.clone();
    Router::new()
        .route("/liveness", get(liveness))
        .route("/readiness", get(readiness))
        .route(&doc_route, get(openapi_json))
        .with_state(state)
}
