use chrono::{DateTime, Utc};
use db::models::SessionTarget;
use db::models::check_in_session::{self, SessionMode, SessionStatus};
use serde::{Deserialize, Serialize};
use services::AttendanceError;
use services::reconciliation::ClosingSummary;

/// Body of `POST /api/sessions`.
///
/// Either `class_id` with `lesson_id`, or `exam_id`.
#[derive(Debug, Deserialize)]
pub struct OpenSessionReq {
    pub class_id: Option<i64>,
    pub lesson_id: Option<String>,
    pub exam_id: Option<i64>,
    pub level: i16,
    #[serde(default = "default_mode")]
    pub mode: SessionMode,
}

fn default_mode() -> SessionMode {
    SessionMode::Standard
}

impl OpenSessionReq {
    pub fn target(&self) -> Result<SessionTarget, AttendanceError> {
        let lesson_id = self.lesson_id.as_deref().map(str::trim).filter(|l| !l.is_empty());
        match (self.class_id, lesson_id, self.exam_id) {
            (Some(class_id), Some(lesson_id), None) => Ok(SessionTarget::class(class_id, lesson_id)),
            (None, None, Some(exam_id)) => Ok(SessionTarget::exam(exam_id)),
            _ => Err(AttendanceError::invalid_input(
                "Provide either class_id and lesson_id, or exam_id",
            )),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_token: String,
    pub target: SessionTarget,
    pub level: i16,
    pub mode: SessionMode,
    pub status: SessionStatus,
    pub opened_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl TryFrom<check_in_session::Model> for SessionResponse {
    type Error = AttendanceError;

    fn try_from(session: check_in_session::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            target: session.target()?,
            session_token: session.token,
            level: session.level,
            mode: session.mode,
            status: session.status,
            opened_at: session.opened_at,
            expires_at: session.expires_at,
            closed_at: session.closed_at,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct CloseSessionResponse {
    pub session: SessionResponse,
    /// Absent when the session had already been closed.
    pub reconciliation: Option<ClosingSummary>,
}
