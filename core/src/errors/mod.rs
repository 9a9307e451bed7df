//! Domain-specific error types and error handling.

mod types;


pub use types::{AuthError, NotificationError, TokenError, VerificationError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    /// Store failure; `message` is for server-side logs only
    #[error("Database operation failed: {message}")]
    DatabaseOperationFailed { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Verification(#[from] VerificationError),

    #[error(transparent)]
    Notification(#[from] NotificationError),
}

impl DomainError {
    /// Shorthand used by repository implementations
    pub fn database(message: impl Into<String>) -> Self {
        DomainError::DatabaseOperationFailed {
            message: message.into(),
        }
    }

    /// Stable machine-readable code exposed to clients
    pub fn error_code(&self) -> &'static str {
        match self {
            DomainError::Validation { .. } => "validation_error",
            DomainError::Conflict { .. } => "conflict",
            DomainError::NotFound { .. } => "not_found",
            DomainError::DatabaseOperationFailed { .. } => "database_operation_failed",
            DomainError::Internal { .. } => "internal_error",
            DomainError::Auth(e) => e.error_code(),
            DomainError::Token(e) => e.error_code(),
            DomainError::Verification(e) => e.error_code(),
            DomainError::Notification(e) => e.error_code(),
        }
    }

    /// True for failures that must surface as "unauthorized" to clients
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            DomainError::Auth(
                AuthError::AuthenticationFailed
                    | AuthError::Unauthorized
                    | AuthError::InvalidRefreshToken
            ) | DomainError::Token(TokenError::InvalidToken | TokenError::TokenExpired)
        )
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
