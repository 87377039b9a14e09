use axum::{
    Extension, Json,
    extract::{Path, State},
};
use db::models::SessionTarget;
use services::report::{AttendanceReport, ReportBuilder};
use util::state::AppState;

use crate::{auth::AuthUser, errors::ApiError, response::ApiResponse};

/// GET /api/reports/classes/{class_id}/lessons/{lesson_id}
///
/// Per-student status for one lesson. While a reinforced round is open,
/// students who have not re-verified yet show as `missing`.
pub async fn lesson_report(
    State(state): State<AppState>,
    Path((class_id, lesson_id)): Path<(i64, String)>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<AttendanceReport>>, ApiError> {
    let report = ReportBuilder::new(state.db())
        .report(&user.caller(), &SessionTarget::class(class_id, lesson_id))
        .await?;

    Ok(Json(ApiResponse::success(report, "Attendance report retrieved")))
}

/// GET /api/reports/exams/{exam_id}
pub async fn exam_report(
    State(state): State<AppState>,
    Path(exam_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<AttendanceReport>>, ApiError> {
    let report = ReportBuilder::new(state.db())
        .report(&user.caller(), &SessionTarget::exam(exam_id))
        .await?;

    Ok(Json(ApiResponse::success(report, "Attendance report retrieved")))
}
