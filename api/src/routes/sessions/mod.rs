//! `/sessions` route group: open, extend, close and inspect check-in sessions.

use axum::{
    Router,
    routing::{get, post},
};
use util::state::AppState;

pub mod common;
pub mod get;
pub mod post;

pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(post::open_session))
        .route("/{token}/extend", post(post::extend_session))
        .route("/{token}/close", post(post::close_session))
        .route("/{token}/stats", get(get::session_stats))
}
