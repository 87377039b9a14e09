use axum::{
    Extension, Json,
    extract::{Path, State},
};
use services::history::{LessonAttendance, class_history};
use util::state::AppState;

use crate::{auth::AuthUser, errors::ApiError, response::ApiResponse};

/// GET /api/me/classes/{class_id}/attendance
///
/// The caller's status for every lesson of a class they are enrolled in.
pub async fn class_attendance(
    State(state): State<AppState>,
    Path(class_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Vec<LessonAttendance>>>, ApiError> {
    let lessons = class_history(state.db(), &user.caller(), class_id).await?;

    Ok(Json(ApiResponse::success(lessons, "Attendance history retrieved")))
}
