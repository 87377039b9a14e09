//! `/reports` route group.

use axum::{Router, routing::get};
use util::state::AppState;

pub mod get;

pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/classes/{class_id}/lessons/{lesson_id}", get(get::lesson_report))
        .route("/exams/{exam_id}", get(get::exam_report))
}
