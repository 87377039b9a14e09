//! Who is calling, and the role checks every operation starts with.

use db::models::user::UserRole;

use crate::error::AttendanceError;

/// The authenticated user on whose behalf an operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: i64,
    pub role: UserRole,
}

impl Caller {
    pub fn new(user_id: i64, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn student(user_id: i64) -> Self {
        Self::new(user_id, UserRole::Student)
    }

    pub fn teacher(user_id: i64) -> Self {
        Self::new(user_id, UserRole::Teacher)
    }

    pub fn require_student(&self) -> Result<(), AttendanceError> {
        match self.role {
            UserRole::Student => Ok(()),
            UserRole::Teacher => Err(AttendanceError::forbidden(
                "Only students can check in",
            )),
        }
    }

    pub fn require_teacher(&self) -> Result<(), AttendanceError> {
        match self.role {
            UserRole::Teacher => Ok(()),
            UserRole::Student => Err(AttendanceError::forbidden(
                "Only teachers can manage check-in sessions",
            )),
        }
    }
}
