//! Lifecycle of check-in sessions: open, extend, close, lookup and stats.

use chrono::{DateTime, Utc};
use db::models::attendance_log::{self, RecentCheckIn};
use db::models::check_in_session::{self, SessionMode, generate_token};
use db::models::SessionTarget;
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use serde::Serialize;
use util::config::AttendancePolicy;

use crate::error::AttendanceError;
use crate::identity::Caller;
use crate::reconciliation::{self, ClosingSummary};
use crate::targets::{ResolvedTarget, resolve_managed};

const TOKEN_ATTEMPTS: usize = 8;

/// Live view of a session for the teacher who runs it.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStats {
    pub session_token: String,
    pub target: SessionTarget,
    pub count: u64,
    pub recent_checkins: Vec<RecentCheckIn>,
    pub active: bool,
    pub mode: SessionMode,
    pub level: i16,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ClosedSession {
    pub session: check_in_session::Model,
    /// The session had been closed before this call, explicitly or by a
    /// newer session for the same target.
    pub already_closed: bool,
    /// `None` when nothing ran: the session was already closed and had no
    /// pending closing pass.
    pub reconciliation: Option<ClosingSummary>,
}

pub struct SessionStore<'a> {
    db: &'a DatabaseConnection,
    policy: &'a AttendancePolicy,
}

impl<'a> SessionStore<'a> {
    pub fn new(db: &'a DatabaseConnection, policy: &'a AttendancePolicy) -> Self {
        Self { db, policy }
    }

    /// Opens a new session for `target`, closing any other open session for
    /// the same lesson or exam.
    pub async fn open(
        &self,
        caller: &Caller,
        target: &SessionTarget,
        level: i16,
        mode: SessionMode,
    ) -> Result<check_in_session::Model, AttendanceError> {
        caller.require_teacher()?;
        if !(1..=3).contains(&level) {
            return Err(AttendanceError::invalid_input(
                "Verification level must be 1, 2 or 3",
            ));
        }

        let resolved = resolve_managed(self.db, caller, target).await?;
        if matches!(resolved, ResolvedTarget::Exam { .. }) && level != 3 {
            return Err(AttendanceError::invalid_input(
                "Exam sessions require verification level 3",
            ));
        }
        let target = resolved.target();

        let now = Utc::now();
        let expires_at = now + self.policy.session_ttl;

        let txn = self.db.begin().await?;
        let token = unique_token(&txn).await?;
        let superseded = supersede(&txn, &target.key(), None, now).await?;
        let session = check_in_session::Model::create(
            &txn,
            &token,
            &target,
            level,
            mode,
            caller.user_id,
            now,
            expires_at,
        )
        .await?;
        txn.commit().await?;

        tracing::info!(
            session = %session.token,
            target = %session.target_key,
            level,
            mode = %mode,
            superseded,
            teacher = caller.user_id,
            "check-in session opened"
        );

        Ok(session)
    }

    /// Restarts the validity window of a session, reopening it if it was
    /// closed or had expired.
    pub async fn extend(
        &self,
        caller: &Caller,
        token: &str,
    ) -> Result<check_in_session::Model, AttendanceError> {
        let session = self.find_managed(caller, token).await?;

        let now = Utc::now();
        let expires_at = now + self.policy.session_ttl;

        let txn = self.db.begin().await?;
        supersede(&txn, &session.target_key, Some(session.id), now).await?;
        let session = session.reopen(&txn, now, expires_at).await?;
        txn.commit().await?;

        tracing::info!(
            session = %session.token,
            target = %session.target_key,
            expires_at = %session.expires_at,
            "check-in session extended"
        );

        Ok(session)
    }

    /// Closes a session and, for a reinforced round, demotes students who
    /// did not re-verify. Closing an already-closed session only runs a
    /// closing pass that is still pending.
    pub async fn close(&self, caller: &Caller, token: &str) -> Result<ClosedSession, AttendanceError> {
        let session = self.find_managed(caller, token).await?;
        let already_closed = session.status == check_in_session::SessionStatus::Closed;
        if already_closed && !session.needs_reconciliation() {
            return Ok(ClosedSession {
                session,
                already_closed,
                reconciliation: None,
            });
        }

        let now = Utc::now();
        let txn = self.db.begin().await?;
        let session = if already_closed {
            session
        } else {
            session.close(&txn, now).await?
        };
        let (session, summary) = reconciliation::reconcile(&txn, session, now).await?;
        txn.commit().await?;

        tracing::info!(
            session = %session.token,
            target = %session.target_key,
            mode = %session.mode,
            already_closed,
            demoted = summary.demoted.len(),
            "check-in session closed"
        );

        Ok(ClosedSession {
            session,
            already_closed,
            reconciliation: Some(summary),
        })
    }

    /// The session behind `token`, provided it is still accepting check-ins.
    pub async fn lookup(&self, token: &str) -> Result<check_in_session::Model, AttendanceError> {
        lookup_live(self.db, token, Utc::now()).await
    }

    pub async fn stats(&self, caller: &Caller, token: &str) -> Result<SessionStats, AttendanceError> {
        let session = self.find_managed(caller, token).await?;

        let count = attendance_log::Model::count_for_session(self.db, session.id).await?;
        let recent_checkins = attendance_log::Model::recent_for_session(
            self.db,
            session.id,
            self.policy.recent_checkins_limit,
        )
        .await?;

        Ok(SessionStats {
            target: session.target()?,
            active: session.is_live(Utc::now()),
            session_token: session.token,
            count,
            recent_checkins,
            mode: session.mode,
            level: session.level,
            expires_at: session.expires_at,
        })
    }

    /// Resolves a token regardless of expiry and checks that `caller` runs
    /// its target.
    async fn find_managed(
        &self,
        caller: &Caller,
        token: &str,
    ) -> Result<check_in_session::Model, AttendanceError> {
        caller.require_teacher()?;
        let session = check_in_session::Model::find_by_token(self.db, &normalize_token(token))
            .await?
            .ok_or_else(|| AttendanceError::not_found("Session not found"))?;
        resolve_managed(self.db, caller, &session.target()?).await?;
        Ok(session)
    }
}

/// Resolves a token to a live session; expired and closed sessions are
/// reported exactly like unknown ones.
pub async fn lookup_live<C>(
    db: &C,
    token: &str,
    now: DateTime<Utc>,
) -> Result<check_in_session::Model, AttendanceError>
where
    C: ConnectionTrait,
{
    check_in_session::Model::find_live_by_token(db, &normalize_token(token), now)
        .await?
        .ok_or_else(|| AttendanceError::not_found("Session not found or expired"))
}

/// Deletes sessions that expired more than `retention` ago and never
/// received a check-in. Sessions with logs are kept.
pub async fn sweep_abandoned(
    db: &DatabaseConnection,
    now: DateTime<Utc>,
    retention: chrono::Duration,
) -> Result<u64, AttendanceError> {
    let purged = check_in_session::Model::purge_abandoned(db, now - retention).await?;
    if purged > 0 {
        tracing::info!(purged, "abandoned check-in sessions removed");
    }
    Ok(purged)
}

/// Closes the other open sessions for a target. Reinforced rounds closed
/// this way get their closing pass immediately.
async fn supersede<C>(
    db: &C,
    target_key: &str,
    except_id: Option<i64>,
    now: DateTime<Utc>,
) -> Result<usize, AttendanceError>
where
    C: ConnectionTrait,
{
    let closed = check_in_session::Model::close_open_for_target(db, target_key, except_id, now).await?;
    let count = closed.len();
    for session in closed {
        let (session, summary) = reconciliation::reconcile(db, session, now).await?;
        if session.is_reinforced() {
            tracing::info!(
                session = %session.token,
                target = %session.target_key,
                demoted = summary.demoted.len(),
                "superseded reinforced round reconciled"
            );
        }
    }
    Ok(count)
}

fn normalize_token(token: &str) -> String {
    token.trim().to_ascii_uppercase()
}

async fn unique_token<C>(db: &C) -> Result<String, AttendanceError>
where
    C: ConnectionTrait,
{
    for _ in 0..TOKEN_ATTEMPTS {
        let token = generate_token();
        if !check_in_session::Model::token_exists(db, &token).await? {
            return Ok(token);
        }
    }
    Err(AttendanceError::Conflict(
        "Could not allocate a unique session token".into(),
    ))
}
