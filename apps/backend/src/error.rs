//! Error handling for the backend API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use classroom_core::ValidationError;
use serde::Serialize;
use thiserror::Error;

/// Unique constraint on `users.email`.
pub const USERS_EMAIL_KEY: &str = "users_email_key";
/// Unique constraint on `student_schedules (student_id, day, time)`.
pub const SCHEDULE_SLOT_KEY: &str = "student_schedules_slot_key";

/// Shown on every failed login, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "خطأ في البريد الإلكتروني أو كلمة السر.";
pub const EMAIL_TAKEN: &str = "هذا البريد الإلكتروني مسجل بالفعل.";

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("هذا البريد الإلكتروني مسجل بالفعل.")]
    DuplicateEmail,

    #[error("Schedule slot already taken: {0}")]
    DuplicateScheduleSlot(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return match db_err.constraint() {
                    Some(USERS_EMAIL_KEY) => ApiError::DuplicateEmail,
                    Some(SCHEDULE_SLOT_KEY) => {
                        ApiError::DuplicateScheduleSlot(db_err.message().to_string())
                    }
                    _ => ApiError::BadRequest(db_err.message().to_string()),
                };
            }
            if db_err.is_foreign_key_violation() || db_err.is_check_violation() {
                return ApiError::BadRequest(db_err.message().to_string());
            }
        }
        ApiError::Database(err)
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    status: &'static str,
    error: String,
    message: String,
}

impl ApiError {
    fn kind(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::DuplicateEmail => (StatusCode::BAD_REQUEST, "duplicate_email"),
            ApiError::DuplicateScheduleSlot(_) => {
                (StatusCode::BAD_REQUEST, "duplicate_schedule_slot")
            }
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            ApiError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
            ApiError::Migration(_) => (StatusCode::INTERNAL_SERVER_ERROR, "migration_error"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.kind();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(ErrorResponse {
            status: "error",
            error: error_type.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_status() {
        let error = ApiError::Unauthorized(INVALID_CREDENTIALS.to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_not_found_status() {
        let error = ApiError::NotFound("Lesson not found".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_bad_request_status() {
        let error = ApiError::BadRequest("invalid input".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_validation_status() {
        let error = ApiError::from(ValidationError::new("email", "invalid"));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_duplicate_email_status() {
        let response = ApiError::DuplicateEmail.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_duplicate_slot_status() {
        let response = ApiError::DuplicateScheduleSlot("sunday 08:00".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_error_status() {
        let error = ApiError::Internal("unexpected error".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_database_error_status() {
        let error = ApiError::from(sqlx::Error::RowNotFound);
        assert!(matches!(error, ApiError::Database(_)));
        assert_eq!(error.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_display_duplicate_email() {
        assert_eq!(ApiError::DuplicateEmail.to_string(), EMAIL_TAKEN);
    }

    #[test]
    fn test_error_display_unauthorized_is_generic() {
        let error = ApiError::Unauthorized(INVALID_CREDENTIALS.to_string());
        assert_eq!(error.to_string(), INVALID_CREDENTIALS);
    }

    #[test]
    fn test_error_display_validation() {
        let error = ApiError::from(ValidationError::new("duration", "must be positive"));
        assert_eq!(error.to_string(), "Validation error: duration: must be positive");
    }

    #[test]
    fn test_error_display_not_found() {
        let error = ApiError::NotFound("Exam not found".to_string());
        assert_eq!(error.to_string(), "Not found: Exam not found");
    }
}
