use actix_web::{web, HttpResponse};
use validator::Validate;

use us_core::repositories::{AccountRepository, TokenRepository};
use us_shared::types::MessageResponse;

use crate::app::AppState;
use crate::dto::ConfirmCodeRequest;
use crate::handlers::error::{handle_domain_error, validation_error_response};
use crate::middleware::auth::AuthContext;

/// Handler for POST /api/v1/verify-phone/send
///
/// The SMS is sent synchronously; the code only becomes valid once the
/// provider accepted it.
///
/// ## Errors
/// - 400 Bad Request: No phone number on the account
/// - 409 Conflict: Phone already verified
/// - 502 Bad Gateway: SMS provider failure
pub async fn send_phone_code<A, T>(
    state: web::Data<AppState<A, T>>,
    auth: AuthContext,
) -> HttpResponse
where
    A: AccountRepository + 'static,
    T: TokenRepository + 'static,
{
    match state.verification.request_phone_verification(auth.account_id).await {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::new("Verification SMS sent")),
        Err(error) => handle_domain_error(&error),
    }
}

/// Handler for POST /api/v1/verify-phone/confirm
pub async fn confirm_phone_code<A, T>(
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
        .confirm_phone_verification(auth.account_id, &request.code)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::new("Phone number verified")),
        Err(error) => handle_domain_error(&error),
    }
}
