//! Translation of domain failures into HTTP responses
//!
//! Every error body is an [`ErrorResponse`] carrying the stable code from
//! `DomainError::error_code`. Store, queue and transport details are logged
//! here and replaced with a generic message before they reach the client.

use std::collections::HashMap;

use actix_web::{
    error::{InternalError, JsonPayloadError},
    http::StatusCode,
    HttpRequest, HttpResponse,
};
use validator::ValidationErrors;

use us_core::errors::{DomainError, NotificationError, VerificationError};
use us_shared::types::ErrorResponse;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// HTTP status for a domain failure
pub fn status_for(error: &DomainError) -> StatusCode {
    if error.is_authentication_failure() {
        return StatusCode::UNAUTHORIZED;
    }

    match error {
        DomainError::Validation { .. } => StatusCode::BAD_REQUEST,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Conflict { .. } => StatusCode::CONFLICT,
        DomainError::Verification(e) => match e {
            VerificationError::EmailNotProvided
            | VerificationError::PhoneNumberNotFoundInDatabase
            | VerificationError::InvalidVerificationCode => StatusCode::BAD_REQUEST,
            VerificationError::EmailAlreadyVerified | VerificationError::PhoneAlreadyVerified => {
                StatusCode::CONFLICT
            }
            VerificationError::SmsFailure => StatusCode::BAD_GATEWAY,
        },
        DomainError::Notification(NotificationError::EmailTaskPublishingFailed { .. }) => {
            StatusCode::BAD_GATEWAY
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Message safe to show the client
fn public_message(error: &DomainError, status: StatusCode) -> String {
    match error {
        DomainError::Validation { message } | DomainError::Conflict { message } => message.clone(),
        DomainError::NotFound { .. } => "Resource not found".to_string(),
        DomainError::Auth(e) => e.to_string(),
        DomainError::Token(_) => "Invalid token".to_string(),
        DomainError::Verification(e) => e.to_string(),
        DomainError::Notification(NotificationError::EmailTaskPublishingFailed { .. }) => {
            "Failed to queue verification email".to_string()
        }
        _ if status.is_server_error() => INTERNAL_MESSAGE.to_string(),
        other => other.to_string(),
    }
}

/// Build the response for a failed service call
pub fn handle_domain_error(error: &DomainError) -> HttpResponse {
    let status = status_for(error);

    if status.is_server_error() {
        tracing::error!(
            error = %error,
            error_code = error.error_code(),
            status = status.as_u16(),
            "Request failed"
        );
    } else {
        tracing::debug!(error_code = error.error_code(), status = status.as_u16(), "Request rejected");
    }

    HttpResponse::build(status).json(ErrorResponse::new(
        error.error_code(),
        public_message(error, status),
    ))
}

/// 400 response listing the offending fields of a request body
pub fn validation_error_response(errors: &ValidationErrors) -> HttpResponse {
    let details: HashMap<String, serde_json::Value> = errors
        .field_errors()
        .into_iter()
        .map(|(field, field_errors)| {
            let codes: Vec<String> = field_errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), serde_json::json!(codes))
        })
        .collect();

    HttpResponse::BadRequest().json(
        ErrorResponse::new("validation_error", "Invalid request data").with_details(details),
    )
}

/// 400 for a body that could not be parsed
pub fn invalid_body_response(err: &impl std::fmt::Display) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse::new(
        "validation_error",
        format!("Invalid request body: {}", err),
    ))
}

/// Malformed or missing JSON bodies get the same envelope as every other error
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = invalid_body_response(&err);
    InternalError::from_response(err, response).into()
}
