//! HTTP mapping of attendance errors.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::AttendanceError;

use crate::response::{ApiResponse, Empty};

/// An [`AttendanceError`] on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub AttendanceError);

impl From<AttendanceError> for ApiError {
    fn from(err: AttendanceError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            AttendanceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AttendanceError::Forbidden(_) => StatusCode::FORBIDDEN,
            AttendanceError::NotFound(_) => StatusCode::NOT_FOUND,
            AttendanceError::Mismatch(_) => StatusCode::BAD_REQUEST,
            AttendanceError::BiometricMismatch { .. } => StatusCode::UNAUTHORIZED,
            AttendanceError::Conflict(_) => StatusCode::CONFLICT,
            AttendanceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self.0 {
            AttendanceError::Internal(err) => {
                tracing::error!(error = %err, "storage failure");
                "Internal server error".to_owned()
            }
            other => other.to_string(),
        };

        (status, Json(ApiResponse::<Empty>::error(message))).into_response()
    }
}
