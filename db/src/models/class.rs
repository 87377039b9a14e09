use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, QuerySelect, QueryTrait, Set};
use serde::Serialize;

use super::{class_student, lesson, user};

/// A taught class; its roster lives in `class_students` and its schedule in `lessons`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "classes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Public class code, e.g. "IT101".
    pub code: String,
    pub name: String,
    /// Owning teacher; the only user allowed to open sessions for its lessons.
    pub teacher_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::TeacherId",
        to = "super::user::Column::Id"
    )]
    Teacher,
    #[sea_orm(has_many = "super::lesson::Entity")]
    Lessons,
}

impl Related<super::lesson::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lessons.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(db: &DbConn, code: &str, name: &str, teacher_id: i64) -> Result<Model, DbErr> {
        ActiveModel {
            code: Set(code.to_owned()),
            name: Set(name.to_owned()),
            teacher_id: Set(teacher_id),
            created_at: Set(Utc::now()),
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

    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.teacher_id == user_id
    }

    pub async fn find_lesson<C>(&self, db: &C, lesson_id: &str) -> Result<Option<lesson::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        lesson::Entity::find_by_id((self.id, lesson_id.to_owned()))
            .one(db)
            .await
    }

    pub async fn lessons<C>(&self, db: &C) -> Result<Vec<lesson::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        lesson::Entity::find()
            .filter(lesson::Column::ClassId.eq(self.id))
            .order_by_asc(lesson::Column::Date)
            .all(db)
            .await
    }

    pub async fn add_student(&self, db: &DbConn, user_id: i64) -> Result<(), DbErr> {
        class_student::ActiveModel {
            class_id: Set(self.id),
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
        let found = class_student::Entity::find_by_id((self.id, user_id))
            .one(db)
            .await?;
        Ok(found.is_some())
    }

    /// Roster members, ordered by username.
    pub async fn students<C>(&self, db: &C) -> Result<Vec<user::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        let roster = class_student::Entity::find()
            .select_only()
            .column(class_student::Column::UserId)
            .filter(class_student::Column::ClassId.eq(self.id))
            .into_query();

        user::Entity::find()
            .filter(user::Column::Id.in_subquery(roster))
            .order_by_asc(user::Column::Username)
            .all(db)
            .await
    }
}
