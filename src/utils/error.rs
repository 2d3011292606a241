use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;

use crate::database::{Resource, StoreError};

/// Errors surfaced to HTTP clients.
///
/// Auth failures answer with a JSON `{success, message}` body; document
/// handlers answer with plain text.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("User already exists")]
    UserExists,

    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Unexpected failure on an auth path, already logged with its cause.
    #[error("{0}")]
    Internal(String),

    #[error("Invalid {0} id")]
    InvalidId(&'static str),

    #[error("No fields to update")]
    EmptyUpdate,

    #[error("{0} not found")]
    NotFound(String),

    /// Unexpected failure on a document path, already logged.
    #[error("{0}")]
    Operation(String),
}

impl AppError {
    /// Logs the cause and builds the plain-text 500 for a document operation,
    /// e.g. "Error occurred while adding donation".
    pub fn operation(action: &str, subject: &str, cause: StoreError) -> Self {
        let message = format!("Error occurred while {} {}", action, subject);
        log::error!("❌ {}: {}", message, cause);
        AppError::Operation(message)
    }

    pub fn internal(message: &str, cause: impl std::fmt::Display) -> Self {
        log::error!("❌ {}: {}", message, cause);
        AppError::Internal(message.to_string())
    }

    pub fn not_found(resource: Resource) -> Self {
        AppError::NotFound(resource.title())
    }

    fn is_json(&self) -> bool {
        matches!(
            self,
            AppError::UserExists | AppError::InvalidCredentials | AppError::Internal(_)
        )
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    message: String,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::UserExists => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidId(_) => StatusCode::BAD_REQUEST,
            AppError::EmptyUpdate => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Operation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        if self.is_json() {
            return HttpResponse::build(status).json(ErrorResponse {
                success: false,
                message: self.to_string(),
            });
        }

        HttpResponse::build(status)
            .content_type("text/plain; charset=utf-8")
            .body(self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::UserExists.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::not_found(Resource::Donations).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::InvalidId("donation").status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_messages() {
        assert_eq!(AppError::not_found(Resource::Donations).to_string(), "Donation not found");
        assert_eq!(AppError::InvalidId("donation").to_string(), "Invalid donation id");

        let err = AppError::operation(
            "adding",
            "donation",
            StoreError::Unavailable("down".to_string()),
        );
        assert_eq!(err.to_string(), "Error occurred while adding donation");
    }

    #[test]
    fn test_internal_hides_cause() {
        let err = AppError::internal("Login failed", "connection refused");
        assert_eq!(err.to_string(), "Login failed");
        assert!(err.is_json());
    }
}
