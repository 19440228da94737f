use crate::handlers::example::do_something;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn example_routes(state: AppState) -> Router {
    Router::new().route("/do", get(do_something)).with_state(state)
}
