//! `/me` route group: endpoints scoped to the calling student.

use axum::{Router, routing::get};
use util::state::AppState;

pub mod get;

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/classes/{class_id}/attendance", get(get::class_attendance))
}
