//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::value_object::registration_status::RegistrationStatus;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed input to a value object or request body
    #[error("{0}")]
    Validation(String),

    /// Unknown email or wrong password; both render identically
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Session token has a bad signature, is expired or is malformed
    #[error("invalid or expired session")]
    SessionInvalid,

    /// No session cookie on the request
    #[error("authentication required")]
    SessionMissing,

    /// Credentials are valid but the registration status forbids login
    #[error("login not permitted")]
    AccountNotEligible,

    /// Email is already registered
    #[error("user already exists")]
    AlreadyExists,

    /// No user with the addressed id
    #[error("user not found")]
    NotFound,

    /// Registration status transition not allowed
    #[error("cannot change registration status from {from} to {to}")]
    InvalidStateTransition {
        from: RegistrationStatus,
        to: RegistrationStatus,
    },

    /// CSRF failure or missing role
    #[error("{0}")]
    Forbidden(&'static str),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) | AuthError::InvalidStateTransition { .. } => {
                StatusCode::BAD_REQUEST
            }
            AuthError::InvalidCredentials
            | AuthError::SessionInvalid
            | AuthError::SessionMissing
            | AuthError::AccountNotEligible => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden(_) => StatusCode::FORBIDDEN,
            AuthError::NotFound => StatusCode::NOT_FOUND,
            AuthError::AlreadyExists => StatusCode::CONFLICT,
            AuthError::Database(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) | AuthError::InvalidStateTransition { .. } => {
                ErrorKind::BadRequest
            }
            AuthError::InvalidCredentials
            | AuthError::SessionInvalid
            | AuthError::SessionMissing
            | AuthError::AccountNotEligible => ErrorKind::Unauthorized,
            AuthError::Forbidden(_) => ErrorKind::Forbidden,
            AuthError::NotFound => ErrorKind::NotFound,
            AuthError::AlreadyExists => ErrorKind::Conflict,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::Validation(_) => "VALIDATION_ERROR",
            AuthError::InvalidCredentials | AuthError::SessionInvalid => "AUTHENTICATION_FAILED",
            AuthError::SessionMissing => "AUTHENTICATION_REQUIRED",
            AuthError::AccountNotEligible => "ACCOUNT_NOT_ELIGIBLE",
            AuthError::AlreadyExists => "USER_ALREADY_EXISTS",
            AuthError::NotFound => "USER_NOT_FOUND",
            AuthError::InvalidStateTransition { .. } => "INVALID_STATUS_TRANSITION",
            AuthError::Forbidden(_) => "FORBIDDEN",
            AuthError::Database(_) | AuthError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string()).with_code(self.code())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::Forbidden(reason) => {
                tracing::warn!(reason, "Request forbidden");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<tokio::task::JoinError> for AuthError {
    fn from(err: tokio::task::JoinError) -> Self {
        AuthError::Internal(format!("blocking task failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_failures_share_status_and_code() {
        let wrong = AuthError::InvalidCredentials;
        let expired = AuthError::SessionInvalid;
        assert_eq!(wrong.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(wrong.code(), expired.code());
        assert_eq!(wrong.to_string(), "invalid credentials");
    }

    #[test]
    fn test_not_eligible_is_distinct() {
        let err = AuthError::AccountNotEligible;
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.code(), "ACCOUNT_NOT_ELIGIBLE");
        assert_eq!(err.to_string(), "login not permitted");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AuthError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AuthError::AlreadyExists.status_code(), StatusCode::CONFLICT);
        assert_eq!(AuthError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AuthError::Forbidden("admin role required").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthError::InvalidStateTransition {
                from: RegistrationStatus::Approved,
                to: RegistrationStatus::Approved,
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_is_masked() {
        let app = AuthError::Internal("pool timed out at 10.0.0.3".into()).to_app_error();
        assert_eq!(app.code(), "INTERNAL_ERROR");
        assert!(!app.public_message().contains("10.0.0.3"));
    }

    #[test]
    fn test_app_error_keeps_code() {
        let app = AuthError::AlreadyExists.to_app_error();
        assert_eq!(app.status_code(), 409);
        assert_eq!(app.code(), "USER_ALREADY_EXISTS");
        assert_eq!(app.public_message(), "user already exists");
    }
}
