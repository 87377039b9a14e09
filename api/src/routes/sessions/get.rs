use axum::{
    Extension, Json,
    extract::{Path, State},
};
use services::session_store::{SessionStats, SessionStore};
use util::state::AppState;

use crate::{auth::AuthUser, errors::ApiError, response::ApiResponse};

/// GET /api/sessions/{token}/stats
///
/// Number of check-ins so far and the most recent ones, newest first. Works
/// for closed and expired sessions too.
pub async fn session_stats(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<SessionStats>>, ApiError> {
    let stats = SessionStore::new(state.db(), state.policy())
        .stats(&user.caller(), &token)
        .await?;

    Ok(Json(ApiResponse::success(stats, "Session stats retrieved")))
}
