//! Error types for authentication, tokens, verification and notification delivery.

use thiserror::Error;

/// Credential and session errors.
///
/// `AuthenticationFailed` covers both an unknown email and a wrong password.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Password hashing failed")]
    HashingError,
}

impl AuthError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::AuthenticationFailed => "authentication_failed",
            AuthError::Unauthorized => "unauthorized",
            AuthError::InvalidRefreshToken => "invalid_refresh_token",
            AuthError::HashingError => "internal_error",
        }
    }
}

/// Signed token errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

impl TokenError {
    pub fn error_code(&self) -> &'static str {
        match self {
            TokenError::InvalidToken | TokenError::TokenExpired => "invalid_token",
            TokenError::TokenGenerationFailed => "internal_error",
        }
    }
}

/// Email and phone ownership verification errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Email not provided")]
    EmailNotProvided,

    #[error("Email already verified")]
    EmailAlreadyVerified,

    #[error("Phone number not found in database")]
    PhoneNumberNotFoundInDatabase,

    #[error("Phone number already verified")]
    PhoneAlreadyVerified,

    #[error("Invalid verification code")]
    InvalidVerificationCode,

    #[error("Failed to send SMS")]
    SmsFailure,
}

impl VerificationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            VerificationError::EmailNotProvided => "email_not_provided",
            VerificationError::EmailAlreadyVerified => "email_already_verified",
            VerificationError::PhoneNumberNotFoundInDatabase => "phone_number_not_found",
            VerificationError::PhoneAlreadyVerified => "phone_already_verified",
            VerificationError::InvalidVerificationCode => "invalid_verification_code",
            VerificationError::SmsFailure => "sms_failure",
        }
    }
}

/// Task queue and delivery errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotificationError {
    #[error("Refusing to publish an empty task")]
    EmptyTask,

    #[error("Failed to publish email task: {reason}")]
    EmailTaskPublishingFailed { reason: String },

    #[error("Email template not found: {code}")]
    TemplateNotFound { code: String },

    #[error("Missing required template parameter: {param}")]
    MissingTemplateParameter { param: String },

    #[error("Malformed task payload: {message}")]
    Serialization { message: String },

    #[error("Delivery transport failed: {message}")]
    Transport { message: String },
}

impl NotificationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            NotificationError::EmailTaskPublishingFailed { .. } => "email_task_publishing_failed",
            _ => "internal_error",
        }
    }
}

impl From<serde_json::Error> for NotificationError {
    fn from(err: serde_json::Error) -> Self {
        NotificationError::Serialization {
            message: err.to_string(),
        }
    }
}
