//! `/check-in` route group.

use axum::{Router, routing::post};
use util::state::AppState;

pub mod post;

pub fn check_in_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(post::submit_check_in))
        .route("/validate", post(post::validate_session))
}
