use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use services::verification::{CheckInReceipt, CheckInRequest, SessionValidation, VerificationPipeline};
use util::state::AppState;

use crate::{auth::AuthUser, errors::ApiError, response::ApiResponse};

/// POST /api/check-in
///
/// Submits a check-in with the student's NFC card and, for level 2 and up,
/// a face embedding.
///
/// ### Request Body
/// ```json
/// { "session_token": "1A2B3C4D", "nfc_value": "04:a2:3b", "face_embedding": [0.12, -0.4] }
/// ```
///
/// ### Responses
/// - `200 OK` with the resolved class, lesson or exam. A repeated check-in
///   in the same session also answers `200`.
/// - `400 Bad Request` (missing factor, card mismatch)
/// - `401 Unauthorized` (face similarity below the threshold)
/// - `403 Forbidden` (not on the exam roster, or not eligible for a reinforced round)
/// - `404 Not Found` (unknown or expired session)
pub async fn submit_check_in(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CheckInRequest>,
) -> Result<Json<ApiResponse<CheckInReceipt>>, ApiError> {
    let receipt = VerificationPipeline::new(state.db(), state.policy())
        .check_in(&user.caller(), &body)
        .await?;

    let message = if receipt.already_checked_in {
        "Already checked in"
    } else {
        "Check-in successful"
    };
    Ok(Json(ApiResponse::success(receipt, message)))
}

#[derive(Debug, Deserialize)]
pub struct ValidateSessionReq {
    pub session_token: String,
}

/// POST /api/check-in/validate
///
/// Pre-flight check before capturing biometrics.
///
/// ### Responses
/// - `200 OK` when the student may check in, with the level and mode
/// - `409 Conflict` when the student is blocked, with the reason
/// - `404 Not Found` (unknown or expired session)
pub async fn validate_session(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<ValidateSessionReq>,
) -> Result<Response, ApiError> {
    let outcome = VerificationPipeline::new(state.db(), state.policy())
        .validate_session(&user.caller(), &body.session_token)
        .await?;

    let blocked = match &outcome {
        SessionValidation::Blocked { reason } => Some(reason.clone()),
        SessionValidation::Ready { .. } => None,
    };

    Ok(match blocked {
        Some(reason) => {
            (StatusCode::CONFLICT, Json(ApiResponse::failure(outcome, reason))).into_response()
        }
        None => Json(ApiResponse::success(outcome, "Session is valid")).into_response(),
    })
}
