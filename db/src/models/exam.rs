use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, QuerySelect, QueryTrait, Set};
use serde::Serialize;

use super::{exam_student, user};

/// A supervised exam with its own roster of eligible students.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "exams")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Public exam code, e.g. "EXAM_MOB101".
    pub code: String,
    pub name: String,
    pub date: DateTime<Utc>,
    pub room: String,
    /// The teacher recorded as supervisor; the only user allowed to open sessions.
    pub supervisor_id: i64,
    pub is_finished: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::SupervisorId",
        to = "super::user::Column::Id"
    )]
    Supervisor,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DbConn,
        code: &str,
        name: &str,
        date: DateTime<Utc>,
        room: &str,
        supervisor_id: i64,
        is_finished: bool,
    ) -> Result<Model, DbErr> {
        ActiveModel {
            code: Set(code.to_owned()),
            name: Set(name.to_owned()),
            date: Set(date),
            room: Set(room.to_owned()),
            supervisor_id: Set(supervisor_id),
            is_finished: Set(is_finished),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn find_by_id<C>(db: &C, id: i64) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find_by_id(id).one(db).await
    }

    pub fn is_supervised_by(&self, user_id: i64) -> bool {
        self.supervisor_id == user_id
    }

    pub async fn add_student(&self, db: &DbConn, user_id: i64) -> Result<(), DbErr> {
        exam_student::ActiveModel {
            exam_id: Set(self.id),
            user_id: Set(user_id),
        }
        .insert(db)
        .await?;
        Ok(())
    }

    pub async fn has_student<C>(&self, db: &C, user_id: i64) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        let found = exam_student::Entity::find_by_id((self.id, user_id))
            .one(db)
            .await?;
        Ok(found.is_some())
    }

    /// Roster members, ordered by username.
    pub async fn students<C>(&self, db: &C) -> Result<Vec<user::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        let roster = exam_student::Entity::find()
            .select_only()
            .column(exam_student::Column::UserId)
            .filter(exam_student::Column::ExamId.eq(self.id))
            .into_query();

        user::Entity::find()
            .filter(user::Column::Id.in_subquery(roster))
            .order_by_asc(user::Column::Username)
            .all(db)
            .await
    }
}
