use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::target::{SessionTarget, TargetKind};

/// The reconciled outcome for one student and one lesson or exam.
///
/// Unique on `(student_id, target_key)`. Check-ins upsert it; a reinforced
/// session closing may demote it to absent.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "attendance_results")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub target_kind: TargetKind,
    pub target_key: String,
    pub class_id: Option<i64>,
    pub lesson_id: Option<String>,
    pub exam_id: Option<i64>,
    pub status: ResultStatus,
    pub first_check_in: DateTime<Utc>,
    pub last_check_in: DateTime<Utc>,
    pub check_in_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ResultStatus {
    #[sea_orm(string_value = "present")]
    Present,

    #[sea_orm(string_value = "absent")]
    Absent,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::StudentId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Student,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_present(&self) -> bool {
        self.status == ResultStatus::Present
    }

    /// Records a check-in: inserts a present result, or marks the existing one
    /// present again and bumps its counter.
    pub async fn upsert_present<C>(
        db: &C,
        student_id: i64,
        target: &SessionTarget,
        now: DateTime<Utc>,
    ) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let row = ActiveModel {
            student_id: Set(student_id),
            target_kind: Set(target.kind()),
            target_key: Set(target.key()),
            class_id: Set(target.class_id()),
            lesson_id: Set(target.lesson_id().map(str::to_owned)),
            exam_id: Set(target.exam_id()),
            status: Set(ResultStatus::Present),
            first_check_in: Set(now),
            last_check_in: Set(now),
            check_in_count: Set(1),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        Entity::insert(row)
            .on_conflict(
                OnConflict::columns([Column::StudentId, Column::TargetKey])
                    .value(
                        Column::CheckInCount,
                        Expr::col((Entity, Column::CheckInCount)).add(1),
                    )
                    .update_columns([Column::Status, Column::LastCheckIn, Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;

        Self::find_for_student(db, student_id, &target.key())
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("attendance result after upsert".into()))
    }

    pub async fn find_for_student<C>(
        db: &C,
        student_id: i64,
        target_key: &str,
    ) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::TargetKey.eq(target_key))
            .one(db)
            .await
    }

    pub async fn find_for_target<C>(db: &C, target_key: &str) -> Result<Vec<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::TargetKey.eq(target_key))
            .all(db)
            .await
    }

    pub async fn find_present_for_target<C>(db: &C, target_key: &str) -> Result<Vec<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::TargetKey.eq(target_key))
            .filter(Column::Status.eq(ResultStatus::Present))
            .all(db)
            .await
    }

    /// Demotes the given students' present results for a target to absent.
    ///
    /// Returns the number of rows changed.
    pub async fn mark_absent<C>(
        db: &C,
        target_key: &str,
        student_ids: &[i64],
        now: DateTime<Utc>,
    ) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        if student_ids.is_empty() {
            return Ok(0);
        }

        let result = Entity::update_many()
            .set(ActiveModel {
                status: Set(ResultStatus::Absent),
                updated_at: Set(now),
                ..Default::default()
            })
            .filter(Column::TargetKey.eq(target_key))
            .filter(Column::Status.eq(ResultStatus::Present))
            .filter(Column::StudentId.is_in(student_ids.iter().copied()))
            .exec(db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Every result a student holds for lessons of one class.
    pub async fn find_for_student_in_class<C>(
        db: &C,
        student_id: i64,
        class_id: i64,
    ) -> Result<Vec<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::TargetKind.eq(TargetKind::Class))
            .filter(Column::ClassId.eq(class_id))
            .all(db)
            .await
    }
}
