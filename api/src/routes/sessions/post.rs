use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use services::session_store::SessionStore;
use util::state::AppState;

use super::common::{CloseSessionResponse, OpenSessionReq, SessionResponse};
use crate::{auth::AuthUser, errors::ApiError, response::ApiResponse};

/// POST /api/sessions
///
/// Opens a check-in session for a lesson or an exam. Any other open session
/// for the same target is closed.
///
/// ### Request Body
/// ```json
/// { "class_id": 1, "lesson_id": "L01", "level": 2, "mode": "standard" }
/// ```
///
/// ### Responses
/// - `201 Created` with the session
/// - `400 Bad Request` (bad target or level)
/// - `403 Forbidden` (not the class owner or exam supervisor)
/// - `404 Not Found` (unknown class, lesson or exam)
pub async fn open_session(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<OpenSessionReq>,
) -> Result<(StatusCode, Json<ApiResponse<SessionResponse>>), ApiError> {
    let target = body.target()?;
    let session = SessionStore::new(state.db(), state.policy())
        .open(&user.caller(), &target, body.level, body.mode)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            SessionResponse::try_from(session)?,
            "Check-in session opened",
        )),
    ))
}

/// POST /api/sessions/{token}/extend
///
/// Restarts the session's validity window from now.
pub async fn extend_session(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<SessionResponse>>, ApiError> {
    let session = SessionStore::new(state.db(), state.policy())
        .extend(&user.caller(), &token)
        .await?;

    Ok(Json(ApiResponse::success(
        SessionResponse::try_from(session)?,
        "Check-in session extended",
    )))
}

/// POST /api/sessions/{token}/close
///
/// Closes the session. For a reinforced session, students who were present
/// before the round but did not re-verify are marked absent.
pub async fn close_session(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<CloseSessionResponse>>, ApiError> {
    let closed = SessionStore::new(state.db(), state.policy())
        .close(&user.caller(), &token)
        .await?;

    let message = if closed.already_closed {
        "Check-in session was already closed"
    } else {
        "Check-in session closed"
    };

    Ok(Json(ApiResponse::success(
        CloseSessionResponse {
            session: SessionResponse::try_from(closed.session)?,
            reconciliation: closed.reconciliation,
        },
        message,
    )))
}
