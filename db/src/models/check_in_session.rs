//! Check-in sessions: short-lived windows a teacher opens for one lesson or exam.
//!
//! A session is *live* while `status = open` and the clock is before
//! `expires_at`. At most one open session exists per target; opening or
//! extending one closes every other open session for the same target.

use chrono::{DateTime, Utc};
use rand::RngCore;
use sea_orm::entity::prelude::*;
use sea_orm::{Condition, QueryOrder, QuerySelect, QueryTrait, Set};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::attendance_log;
use super::target::{SessionTarget, TargetKind};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "check_in_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Short code shown to students (8 uppercase hex characters).
    pub token: String,
    pub target_kind: TargetKind,
    pub target_key: String,
    pub class_id: Option<i64>,
    pub lesson_id: Option<String>,
    pub exam_id: Option<i64>,
    /// Verification level: 1 card only, 2 card and face, 3 card and face (exams).
    pub level: i16,
    pub mode: SessionMode,
    pub status: SessionStatus,
    pub opened_by: i64,
    pub opened_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    /// When the closing pass last ran. Only ever set on reinforced sessions.
    pub reconciled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SessionMode {
    /// A check-in establishes presence.
    #[sea_orm(string_value = "standard")]
    Standard,

    /// A check-in only confirms an earlier presence; students missing from
    /// the session when it closes are demoted to absent.
    #[sea_orm(string_value = "reinforced")]
    Reinforced,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SessionStatus {
    #[sea_orm(string_value = "open")]
    Open,

    #[sea_orm(string_value = "closed")]
    Closed,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OpenedBy",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Opener,
    #[sea_orm(has_many = "super::attendance_log::Entity")]
    Logs,
}

impl Related<super::attendance_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Logs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Eight uppercase hex characters drawn from four random bytes.
pub fn generate_token() -> String {
    let mut bytes = [0u8; 4];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode_upper(bytes)
}

impl Model {
    pub fn target(&self) -> Result<SessionTarget, DbErr> {
        SessionTarget::from_columns(
            self.target_kind,
            self.class_id,
            self.lesson_id.as_deref(),
            self.exam_id,
        )
    }

    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.status == SessionStatus::Open && now < self.expires_at
    }

    pub fn requires_face(&self) -> bool {
        self.level >= 2
    }

    pub fn is_reinforced(&self) -> bool {
        self.mode == SessionMode::Reinforced
    }

    /// A reinforced round whose drop-outs have not been demoted yet.
    pub fn needs_reconciliation(&self) -> bool {
        self.is_reinforced() && self.reconciled_at.is_none()
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create<C>(
        db: &C,
        token: &str,
        target: &SessionTarget,
        level: i16,
        mode: SessionMode,
        opened_by: i64,
        opened_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        ActiveModel {
            token: Set(token.to_owned()),
            target_kind: Set(target.kind()),
            target_key: Set(target.key()),
            class_id: Set(target.class_id()),
            lesson_id: Set(target.lesson_id().map(str::to_owned)),
            exam_id: Set(target.exam_id()),
            level: Set(level),
            mode: Set(mode),
            status: Set(SessionStatus::Open),
            opened_by: Set(opened_by),
            opened_at: Set(opened_at),
            expires_at: Set(expires_at),
            closed_at: Set(None),
            reconciled_at: Set(None),
            created_at: Set(opened_at),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn token_exists<C>(db: &C, token: &str) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        let count = Entity::find()
            .filter(Column::Token.eq(token))
            .count(db)
            .await?;
        Ok(count > 0)
    }

    /// Any session with this token, live or not.
    pub async fn find_by_token<C>(db: &C, token: &str) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::Token.eq(token))
            .one(db)
            .await
    }

    /// The session with this token, only if it is still accepting check-ins.
    pub async fn find_live_by_token<C>(
        db: &C,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        let session = Self::find_by_token(db, token).await?;
        Ok(session.filter(|s| s.is_live(now)))
    }

    /// The live session for a target, if any. The newest one wins should two
    /// ever be open at once.
    pub async fn find_live_for_target<C>(
        db: &C,
        target_key: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        let open = Entity::find()
            .filter(Column::TargetKey.eq(target_key))
            .filter(Column::Status.eq(SessionStatus::Open))
            .order_by_desc(Column::OpenedAt)
            .order_by_desc(Column::Id)
            .all(db)
            .await?;

        Ok(open.into_iter().find(|s| s.is_live(now)))
    }

    /// Closes every open session for a target except `except_id`.
    ///
    /// Returns the sessions it closed.
    pub async fn close_open_for_target<C>(
        db: &C,
        target_key: &str,
        except_id: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut condition = Condition::all()
            .add(Column::TargetKey.eq(target_key))
            .add(Column::Status.eq(SessionStatus::Open));
        if let Some(id) = except_id {
            condition = condition.add(Column::Id.ne(id));
        }

        let open = Entity::find().filter(condition).all(db).await?;
        let mut closed = Vec::with_capacity(open.len());
        for session in open {
            closed.push(session.close(db, now).await?);
        }
        Ok(closed)
    }

    /// Re-opens this session as if it had just been opened at `now`.
    pub async fn reopen<C>(
        self,
        db: &C,
        now: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active: ActiveModel = self.into();
        active.status = Set(SessionStatus::Open);
        active.opened_at = Set(now);
        active.expires_at = Set(expires_at);
        active.closed_at = Set(None);
        active.reconciled_at = Set(None);
        active.update(db).await
    }

    /// Marks this session closed. The expiry is pulled forward to `now` so a
    /// closed session never appears live again.
    pub async fn close<C>(self, db: &C, now: DateTime<Utc>) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let expires_at = self.expires_at.min(now);
        let mut active: ActiveModel = self.into();
        active.status = Set(SessionStatus::Closed);
        active.expires_at = Set(expires_at);
        active.closed_at = Set(Some(now));
        active.update(db).await
    }

    pub async fn mark_reconciled<C>(self, db: &C, now: DateTime<Utc>) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active: ActiveModel = self.into();
        active.reconciled_at = Set(Some(now));
        active.update(db).await
    }

    /// Deletes sessions that expired before `cutoff` and never received a
    /// check-in. Reinforced rounds still awaiting their closing pass are kept.
    pub async fn purge_abandoned<C>(db: &C, cutoff: DateTime<Utc>) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        let used = attendance_log::Entity::find()
            .select_only()
            .column(attendance_log::Column::SessionId)
            .distinct()
            .into_query();

        let result = Entity::delete_many()
            .filter(Column::ExpiresAt.lt(cutoff))
            .filter(Column::Id.not_in_subquery(used))
            .filter(
                Condition::any()
                    .add(Column::Mode.eq(SessionMode::Standard))
                    .add(Column::ReconciledAt.is_not_null()),
            )
            .exec(db)
            .await?;

        Ok(result.rows_affected)
    }
}
