use actix_web::{web, HttpResponse};
use validator::Validate;

use us_core::repositories::{AccountRepository, TokenRepository};
use us_shared::types::MessageResponse;

use crate::app::AppState;
use crate::dto::ConfirmCodeRequest;
use crate::handlers::error::{handle_domain_error, validation_error_response};
use crate::middleware::auth::AuthContext;

/// Handler for POST /api/v1/verify-email/send
///
/// Stores a fresh code digest and queues the email; delivery happens in the
/// notification worker, so a 200 means "queued", not "delivered".
///
/// ## Errors
/// - 409 Conflict: Email already verified
/// - 502 Bad Gateway: The task could not be queued
pub async fn send_email_code<A, T>(
    state: web::Data<AppState<A, T>>,
    auth: AuthContext,
) -> HttpResponse
where
    A: AccountRepository + 'static,
    T: TokenRepository + 'static,
{
    match state.verification.request_email_verification(auth.account_id).await {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::new("Verification email sent")),
        Err(error) => handle_domain_error(&error),
    }
}

/// Handler for POST /api/v1/verify-email/confirm
///
/// ## Errors
/// - 400 Bad Request: Wrong, expired or missing code
/// - 409 Conflict: Email already verified
pub async fn confirm_email_code<A, T>(
    state: web::Data<AppState<A, T>>,
    auth: AuthContext,
    request: web::Json<ConfirmCodeRequest>,
) -> HttpResponse
where
    A: AccountRepository + 'static,
    T: TokenRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    match state
        .verification
        .confirm_email_verification(auth.account_id, &request.code)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::new("Email verified")),
        Err(error) => handle_domain_error(&error),
    }
}
