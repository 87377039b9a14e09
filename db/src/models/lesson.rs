use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::Serialize;

/// One scheduled meeting of a class.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "lessons")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub class_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub lesson_id: String,
    pub date: DateTime<Utc>,
    pub room: String,
    pub shift: String,
    /// Set once the lesson has taken place; unattended students then count as absent.
    pub is_finished: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::class::Entity",
        from = "Column::ClassId",
        to = "super::class::Column::Id"
    )]
    Class,
}

impl Related<super::class::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DbConn,
        class_id: i64,
        lesson_id: &str,
        date: DateTime<Utc>,
        room: &str,
        shift: &str,
        is_finished: bool,
    ) -> Result<Model, DbErr> {
        ActiveModel {
            class_id: Set(class_id),
            lesson_id: Set(lesson_id.to_owned()),
            date: Set(date),
            room: Set(room.to_owned()),
            shift: Set(shift.to_owned()),
            is_finished: Set(is_finished),
        }
        .insert(db)
        .await
    }
}
