//! Per-student attendance table for a lesson or exam.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use db::models::attendance_log;
use db::models::attendance_result::{self, ResultStatus};
use db::models::check_in_session::{self, SessionMode};
use db::models::SessionTarget;
use sea_orm::DatabaseConnection;
use serde::Serialize;

use crate::error::AttendanceError;
use crate::identity::Caller;
use crate::targets::resolve_managed;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    /// Present earlier but not yet re-verified in the open reinforced round.
    Missing,
    Absent,
    /// No result yet and the lesson or exam has not finished.
    NotChecked,
}

impl AttendanceStatus {
    /// Status shown when no reinforced round is running.
    pub fn settled(result: Option<ResultStatus>, finished: bool) -> Self {
        match result {
            Some(ResultStatus::Present) => Self::Present,
            Some(ResultStatus::Absent) => Self::Absent,
            None if finished => Self::Absent,
            None => Self::NotChecked,
        }
    }

    /// Status shown while a reinforced round is open.
    pub fn reinforced(result: Option<ResultStatus>, logged_this_round: bool) -> Self {
        match (result, logged_this_round) {
            (Some(ResultStatus::Present), true) => Self::Present,
            (Some(ResultStatus::Present), false) => Self::Missing,
            _ => Self::Absent,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentAttendance {
    pub student_id: i64,
    pub username: String,
    pub full_name: String,
    pub status: AttendanceStatus,
    pub check_in_count: i32,
    pub first_check_in: Option<DateTime<Utc>>,
    pub last_check_in: Option<DateTime<Utc>>,
}

/// The live session a report was computed against.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveSession {
    pub session_token: String,
    pub mode: SessionMode,
    pub level: i16,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceReport {
    pub target: SessionTarget,
    pub active_session: Option<ActiveSession>,
    pub total: usize,
    pub present: usize,
    pub missing: usize,
    pub absent: usize,
    pub not_checked: usize,
    pub students: Vec<StudentAttendance>,
}

pub struct ReportBuilder<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn report(
        &self,
        caller: &Caller,
        target: &SessionTarget,
    ) -> Result<AttendanceReport, AttendanceError> {
        let resolved = resolve_managed(self.db, caller, target).await?;
        let target = resolved.target();
        let key = target.key();
        let now = Utc::now();

        let roster = resolved.roster(self.db).await?;
        let results: HashMap<i64, attendance_result::Model> =
            attendance_result::Model::find_for_target(self.db, &key)
                .await?
                .into_iter()
                .map(|r| (r.student_id, r))
                .collect();

        let live = check_in_session::Model::find_live_for_target(self.db, &key, now).await?;
        let round: Option<HashSet<i64>> = match &live {
            Some(session) if session.is_reinforced() => Some(
                attendance_log::Model::student_ids_for_session(self.db, session.id)
                    .await?
                    .into_iter()
                    .collect(),
            ),
            _ => None,
        };

        let finished = resolved.is_finished();
        let students: Vec<StudentAttendance> = roster
            .into_iter()
            .map(|student| {
                let result = results.get(&student.id);
                let result_status = result.map(|r| r.status);
                let status = match &round {
                    Some(logged) => {
                        AttendanceStatus::reinforced(result_status, logged.contains(&student.id))
                    }
                    None => AttendanceStatus::settled(result_status, finished),
                };
                StudentAttendance {
                    student_id: student.id,
                    username: student.username,
                    full_name: student.full_name,
                    status,
                    check_in_count: result.map_or(0, |r| r.check_in_count),
                    first_check_in: result.map(|r| r.first_check_in),
                    last_check_in: result.map(|r| r.last_check_in),
                }
            })
            .collect();

        let count = |status| students.iter().filter(|s| s.status == status).count();

        Ok(AttendanceReport {
            total: students.len(),
            present: count(AttendanceStatus::Present),
            missing: count(AttendanceStatus::Missing),
            absent: count(AttendanceStatus::Absent),
            not_checked: count(AttendanceStatus::NotChecked),
            active_session: live.map(|s| ActiveSession {
                session_token: s.token,
                mode: s.mode,
                level: s.level,
                expires_at: s.expires_at,
            }),
            target,
            students,
        })
    }
}
