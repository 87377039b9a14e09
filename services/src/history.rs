//! A student's own attendance, lesson by lesson.

use chrono::{DateTime, Utc};
use db::models::attendance_result;
use db::models::class;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::collections::HashMap;

use crate::error::AttendanceError;
use crate::identity::Caller;
use crate::report::AttendanceStatus;

/// One lesson in a student's own attendance history.
#[derive(Debug, Clone, Serialize)]
pub struct LessonAttendance {
    pub lesson_id: String,
    pub date: DateTime<Utc>,
    pub room: String,
    pub shift: String,
    pub status: AttendanceStatus,
}

/// The calling student's attendance across every lesson of a class, in
/// lesson date order.
pub async fn class_history(
    db: &DatabaseConnection,
    caller: &Caller,
    class_id: i64,
) -> Result<Vec<LessonAttendance>, AttendanceError> {
    caller.require_student()?;

    let class = class::Model::find_by_id(db, class_id)
        .await?
        .ok_or_else(|| AttendanceError::not_found("Class not found"))?;
    if !class.has_student(db, caller.user_id).await? {
        return Err(AttendanceError::forbidden("You are not enrolled in this class"));
    }

    let results: HashMap<String, attendance_result::ResultStatus> =
        attendance_result::Model::find_for_student_in_class(db, caller.user_id, class.id)
            .await?
            .into_iter()
            .filter_map(|r| r.lesson_id.map(|lesson| (lesson, r.status)))
            .collect();

    let lessons = class.lessons(db).await?;
    Ok(lessons
        .into_iter()
        .map(|lesson| LessonAttendance {
            status: AttendanceStatus::settled(
                results.get(&lesson.lesson_id).copied(),
                lesson.is_finished,
            ),
            lesson_id: lesson.lesson_id,
            date: lesson.date,
            room: lesson.room,
            shift: lesson.shift,
        })
        .collect())
}
