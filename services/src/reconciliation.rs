//! Maintains one authoritative attendance result per student and target.
//!
//! Results only move to `present` through [`record_check_in`] and only move
//! back to `absent` through [`closing_pass`] on a reinforced session.
//! [`reconcile`] runs that pass exactly once per reinforced round, however
//! the round ended.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use db::models::attendance_log;
use db::models::attendance_result;
use db::models::check_in_session;
use db::models::SessionTarget;
use sea_orm::ConnectionTrait;
use serde::Serialize;

use crate::error::AttendanceError;

/// Upserts the student's result for `target` after an accepted check-in.
///
/// Must run in the same transaction as the log insert it follows.
pub async fn record_check_in<C>(
    db: &C,
    student_id: i64,
    target: &SessionTarget,
    now: DateTime<Utc>,
) -> Result<attendance_result::Model, AttendanceError>
where
    C: ConnectionTrait,
{
    let result = attendance_result::Model::upsert_present(db, student_id, target, now).await?;
    Ok(result)
}

/// Outcome of closing a reinforced session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClosingSummary {
    /// Students who re-verified and stay present.
    pub confirmed: Vec<i64>,
    /// Students present before the round who did not re-verify.
    pub demoted: Vec<i64>,
}

/// Demotes every student present for the session's target who has no log in
/// this session. Does nothing for standard sessions.
pub async fn closing_pass<C>(
    db: &C,
    session: &check_in_session::Model,
    now: DateTime<Utc>,
) -> Result<ClosingSummary, AttendanceError>
where
    C: ConnectionTrait,
{
    if !session.is_reinforced() {
        return Ok(ClosingSummary::default());
    }

    let present =
        attendance_result::Model::find_present_for_target(db, &session.target_key).await?;
    let logged: HashSet<i64> = attendance_log::Model::student_ids_for_session(db, session.id)
        .await?
        .into_iter()
        .collect();

    let (mut confirmed, mut demoted): (Vec<i64>, Vec<i64>) = present
        .iter()
        .map(|r| r.student_id)
        .partition(|id| logged.contains(id));
    confirmed.sort_unstable();
    demoted.sort_unstable();

    let changed =
        attendance_result::Model::mark_absent(db, &session.target_key, &demoted, now).await?;

    tracing::info!(
        session = %session.token,
        target = %session.target_key,
        confirmed = confirmed.len(),
        demoted = changed,
        "reinforced round reconciled"
    );

    Ok(ClosingSummary { confirmed, demoted })
}

/// Runs the closing pass for a closed reinforced session that has not been
/// reconciled yet, and records that it ran. Any other session is returned
/// untouched with an empty summary.
pub async fn reconcile<C>(
    db: &C,
    session: check_in_session::Model,
    now: DateTime<Utc>,
) -> Result<(check_in_session::Model, ClosingSummary), AttendanceError>
where
    C: ConnectionTrait,
{
    if !session.needs_reconciliation() {
        return Ok((session, ClosingSummary::default()));
    }
    let summary = closing_pass(db, &session, now).await?;
    let session = session.mark_reconciled(db, now).await?;
    Ok((session, summary))
}
