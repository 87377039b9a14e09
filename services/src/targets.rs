//! Resolution of a [`SessionTarget`] against the roster and schedule tables.

use db::models::{SessionTarget, class, exam, lesson, user};
use sea_orm::ConnectionTrait;

use crate::error::AttendanceError;
use crate::identity::Caller;

/// A target whose class and lesson, or exam, are known to exist.
#[derive(Debug, Clone)]
pub enum ResolvedTarget {
    Class {
        class: class::Model,
        lesson: lesson::Model,
    },
    Exam {
        exam: exam::Model,
    },
}

impl ResolvedTarget {
    pub async fn resolve<C>(db: &C, target: &SessionTarget) -> Result<Self, AttendanceError>
    where
        C: ConnectionTrait,
    {
        match target {
            SessionTarget::Class {
                class_id,
                lesson_id,
            } => {
                let class = class::Model::find_by_id(db, *class_id)
                    .await?
                    .ok_or_else(|| AttendanceError::not_found("Class not found"))?;
                let lesson = class
                    .find_lesson(db, lesson_id)
                    .await?
                    .ok_or_else(|| AttendanceError::not_found("Lesson not found in this class"))?;
                Ok(Self::Class { class, lesson })
            }
            SessionTarget::Exam { exam_id } => {
                let exam = exam::Model::find_by_id(db, *exam_id)
                    .await?
                    .ok_or_else(|| AttendanceError::not_found("Exam not found"))?;
                Ok(Self::Exam { exam })
            }
        }
    }

    pub fn target(&self) -> SessionTarget {
        match self {
            Self::Class { class, lesson } => SessionTarget::class(class.id, lesson.lesson_id.clone()),
            Self::Exam { exam } => SessionTarget::exam(exam.id),
        }
    }

    /// Class owner or exam supervisor.
    pub fn is_managed_by(&self, user_id: i64) -> bool {
        match self {
            Self::Class { class, .. } => class.is_owned_by(user_id),
            Self::Exam { exam } => exam.is_supervised_by(user_id),
        }
    }

    pub fn ensure_managed_by(&self, caller: &Caller) -> Result<(), AttendanceError> {
        caller.require_teacher()?;
        if self.is_managed_by(caller.user_id) {
            return Ok(());
        }
        Err(match self {
            Self::Class { .. } => AttendanceError::forbidden("You do not teach this class"),
            Self::Exam { .. } => AttendanceError::forbidden("You are not the supervisor of this exam"),
        })
    }

    /// Whether the lesson or exam has already taken place.
    pub fn is_finished(&self) -> bool {
        match self {
            Self::Class { lesson, .. } => lesson.is_finished,
            Self::Exam { exam } => exam.is_finished,
        }
    }

    pub async fn roster<C>(&self, db: &C) -> Result<Vec<user::Model>, AttendanceError>
    where
        C: ConnectionTrait,
    {
        let students = match self {
            Self::Class { class, .. } => class.students(db).await?,
            Self::Exam { exam } => exam.students(db).await?,
        };
        Ok(students)
    }
}

/// Resolves `target` and checks that `caller` manages it.
pub async fn resolve_managed<C>(
    db: &C,
    caller: &Caller,
    target: &SessionTarget,
) -> Result<ResolvedTarget, AttendanceError>
where
    C: ConnectionTrait,
{
    let resolved = ResolvedTarget::resolve(db, target).await?;
    resolved.ensure_managed_by(caller)?;
    Ok(resolved)
}
