use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::OnConflict;
use sea_orm::{FromQueryResult, JoinType, QueryOrder, QuerySelect, Set};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::target::{SessionTarget, TargetKind};

/// One accepted check-in of a student in a session.
///
/// `(student_id, session_id)` is unique; a second check-in in the same
/// session is a no-op at the storage level.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "attendance_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub session_id: i64,
    pub target_kind: TargetKind,
    pub target_key: String,
    pub class_id: Option<i64>,
    pub lesson_id: Option<String>,
    pub exam_id: Option<i64>,
    pub method: CheckInMethod,
    pub check_in_time: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CheckInMethod {
    #[sea_orm(string_value = "qr")]
    Qr,

    #[sea_orm(string_value = "qr_face")]
    QrFace,

    #[sea_orm(string_value = "nfc_loc")]
    NfcLoc,
}

impl CheckInMethod {
    /// Method label recorded for a session of the given level.
    pub fn from_level(level: i16) -> Self {
        match level {
            1 => Self::Qr,
            2 => Self::QrFace,
            _ => Self::NfcLoc,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::check_in_session::Entity",
        from = "Column::SessionId",
        to = "super::check_in_session::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Session,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::StudentId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Student,
}

impl Related<super::check_in_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// A log row joined with the student's display fields.
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize)]
pub struct RecentCheckIn {
    pub student_id: i64,
    pub username: String,
    pub full_name: String,
    pub method: CheckInMethod,
    pub check_in_time: DateTime<Utc>,
}

impl Model {
    /// Inserts the log unless the student already checked in to this session.
    ///
    /// Returns `true` when a row was written.
    pub async fn insert_if_absent<C>(
        db: &C,
        student_id: i64,
        session_id: i64,
        target: &SessionTarget,
        method: CheckInMethod,
        now: DateTime<Utc>,
    ) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        let log = ActiveModel {
            student_id: Set(student_id),
            session_id: Set(session_id),
            target_kind: Set(target.kind()),
            target_key: Set(target.key()),
            class_id: Set(target.class_id()),
            lesson_id: Set(target.lesson_id().map(str::to_owned)),
            exam_id: Set(target.exam_id()),
            method: Set(method),
            check_in_time: Set(now),
            ..Default::default()
        };

        let inserted = Entity::insert(log)
            .on_conflict(
                OnConflict::columns([Column::StudentId, Column::SessionId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;

        Ok(inserted > 0)
    }

    pub async fn exists<C>(db: &C, student_id: i64, session_id: i64) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        let count = Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::SessionId.eq(session_id))
            .count(db)
            .await?;
        Ok(count > 0)
    }

    pub async fn student_ids_for_session<C>(db: &C, session_id: i64) -> Result<Vec<i64>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .select_only()
            .column(Column::StudentId)
            .filter(Column::SessionId.eq(session_id))
            .into_tuple::<i64>()
            .all(db)
            .await
    }

    pub async fn count_for_session<C>(db: &C, session_id: i64) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::SessionId.eq(session_id))
            .count(db)
            .await
    }

    /// Latest check-ins of a session, newest first.
    pub async fn recent_for_session<C>(
        db: &C,
        session_id: i64,
        limit: u64,
    ) -> Result<Vec<RecentCheckIn>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .select_only()
            .column(Column::StudentId)
            .column_as(super::user::Column::Username, "username")
            .column_as(super::user::Column::FullName, "full_name")
            .column(Column::Method)
            .column(Column::CheckInTime)
            .join(JoinType::InnerJoin, Relation::Student.def())
            .filter(Column::SessionId.eq(session_id))
            .order_by_desc(Column::CheckInTime)
            .order_by_desc(Column::Id)
            .limit(limit)
            .into_model::<RecentCheckIn>()
            .all(db)
            .await
    }
}
