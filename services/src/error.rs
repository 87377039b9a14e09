use sea_orm::DbErr;
use thiserror::Error;

/// Every way an attendance operation can fail.
#[derive(Debug, Error)]
pub enum AttendanceError {
    /// A required field is missing or malformed, or a factor is not enrolled.
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Forbidden(String),

    /// Unknown or expired session, or unknown class, lesson or exam.
    #[error("{0}")]
    NotFound(String),

    /// The presented card does not match the registered one.
    #[error("{0}")]
    Mismatch(String),

    #[error(
        "Face verification failed: similarity {:.1}% is below the required {:.1}%",
        percent(.similarity),
        percent(.threshold)
    )]
    BiometricMismatch { similarity: f32, threshold: f32 },

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Internal(#[from] DbErr),
}

fn percent(value: &f32) -> f32 {
    value * 100.0
}

impl AttendanceError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn mismatch(msg: impl Into<String>) -> Self {
        Self::Mismatch(msg.into())
    }
}
