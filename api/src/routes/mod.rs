//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → Health check endpoint (public)
//! - `/sessions` → Check-in session lifecycle and stats (teachers)
//! - `/check-in` → Check-in submission and pre-flight validation (students)
//! - `/reports` → Per-lesson and per-exam attendance reports (teachers)
//! - `/me` → The calling student's own attendance history

use crate::auth::guards::{require_student, require_teacher};
use crate::routes::{
    check_in::check_in_routes, health::health_routes, me::me_routes, reports::report_routes,
    sessions::session_routes,
};
use axum::{Router, middleware::from_fn};
use util::state::AppState;

pub mod check_in;
pub mod health;
pub mod me;
pub mod reports;
pub mod sessions;

/// Builds the complete application router for all HTTP endpoints.
///
/// Role guards are applied per group with `route_layer`, so unknown paths
/// still answer `404` rather than `401`.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest("/sessions", session_routes().route_layer(from_fn(require_teacher)))
        .nest("/check-in", check_in_routes().route_layer(from_fn(require_student)))
        .nest("/reports", report_routes().route_layer(from_fn(require_teacher)))
        .nest("/me", me_routes().route_layer(from_fn(require_student)))
        .with_state(app_state)
}
