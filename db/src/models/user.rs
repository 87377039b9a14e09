use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{FromJsonQueryResult, Set};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Represents a user in the `users` table.
///
/// Users are owned by the identity provider; the attendance engine only reads
/// the card identifier and the enrolled face embedding.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Primary key ID (auto-incremented).
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login name, e.g. "sv001" or "gv001".
    pub username: String,
    pub full_name: String,
    pub role: UserRole,
    /// Card identifier as enrolled; compared only after normalization.
    pub nfc_id: Option<String>,
    /// Enrolled face embedding. Empty means "not enrolled".
    #[serde(skip_serializing)]
    #[sea_orm(column_type = "Json")]
    pub face_embedding: FaceEmbedding,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum UserRole {
    #[sea_orm(string_value = "student")]
    Student,

    #[sea_orm(string_value = "teacher")]
    Teacher,
}

/// Face feature vector stored as a JSON array.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct FaceEmbedding(pub Vec<f32>);

impl FaceEmbedding {
    pub fn is_enrolled(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DbConn,
        username: &str,
        full_name: &str,
        role: UserRole,
        nfc_id: Option<&str>,
        face_embedding: Vec<f32>,
    ) -> Result<Model, DbErr> {
        let now = Utc::now();
        let user = ActiveModel {
            username: Set(username.to_owned()),
            full_name: Set(full_name.to_owned()),
            role: Set(role),
            nfc_id: Set(nfc_id.map(str::to_owned)),
            face_embedding: Set(FaceEmbedding(face_embedding)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        user.insert(db).await
    }

    pub async fn find_by_id<C>(db: &C, id: i64) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find_by_id(id).one(db).await
    }

    pub fn is_student(&self) -> bool {
        self.role == UserRole::Student
    }
}
