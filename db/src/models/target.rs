//! What a check-in session, log or result is attached to.
//!
//! Storage keeps the target flattened into nullable `class_id` / `lesson_id` /
//! `exam_id` columns plus a canonical `target_key`; code works with the
//! [`SessionTarget`] union so every class-vs-exam branch is exhaustive.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TargetKind {
    #[sea_orm(string_value = "class")]
    Class,

    #[sea_orm(string_value = "exam")]
    Exam,
}

/// A single lesson of a class, or an exam.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionTarget {
    Class { class_id: i64, lesson_id: String },
    Exam { exam_id: i64 },
}

impl SessionTarget {
    pub fn class(class_id: i64, lesson_id: impl Into<String>) -> Self {
        Self::Class {
            class_id,
            lesson_id: lesson_id.into(),
        }
    }

    pub fn exam(exam_id: i64) -> Self {
        Self::Exam { exam_id }
    }

    pub fn kind(&self) -> TargetKind {
        match self {
            Self::Class { .. } => TargetKind::Class,
            Self::Exam { .. } => TargetKind::Exam,
        }
    }

    /// Canonical natural key, unique per lesson or exam.
    pub fn key(&self) -> String {
        match self {
            Self::Class {
                class_id,
                lesson_id,
            } => format!("class:{class_id}:{lesson_id}"),
            Self::Exam { exam_id } => format!("exam:{exam_id}"),
        }
    }

    pub fn class_id(&self) -> Option<i64> {
        match self {
            Self::Class { class_id, .. } => Some(*class_id),
            Self::Exam { .. } => None,
        }
    }

    pub fn lesson_id(&self) -> Option<&str> {
        match self {
            Self::Class { lesson_id, .. } => Some(lesson_id.as_str()),
            Self::Exam { .. } => None,
        }
    }

    pub fn exam_id(&self) -> Option<i64> {
        match self {
            Self::Class { .. } => None,
            Self::Exam { exam_id } => Some(*exam_id),
        }
    }

    /// Rebuilds a target from its flattened columns.
    pub fn from_columns(
        kind: TargetKind,
        class_id: Option<i64>,
        lesson_id: Option<&str>,
        exam_id: Option<i64>,
    ) -> Result<Self, DbErr> {
        match (kind, class_id, lesson_id, exam_id) {
            (TargetKind::Class, Some(class_id), Some(lesson_id), _) => {
                Ok(Self::class(class_id, lesson_id))
            }
            (TargetKind::Exam, _, _, Some(exam_id)) => Ok(Self::exam(exam_id)),
            (kind, ..) => Err(DbErr::Custom(format!(
                "Incomplete {kind} target columns"
            ))),
        }
    }
}
