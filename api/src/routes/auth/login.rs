use actix_web::{web, HttpResponse};
use validator::Validate;

use us_core::repositories::{AccountRepository, TokenRepository};

use crate::app::AppState;
use crate::dto::LoginRequest;
use crate::handlers::error::{handle_domain_error, validation_error_response};

/// Handler for POST /api/v1/login
///
/// Logging in again while a session is alive returns the same token pair.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "access_token": "eyJ...",
///     "refresh_token": "eyJ...",
///     "token_type": "Bearer",
///     "expires_in": 900
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Missing email or password
/// - 401 Unauthorized: Unknown email or wrong password (indistinguishable)
pub async fn login<A, T>(
    state: web::Data<AppState<A, T>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    A: AccountRepository + 'static,
    T: TokenRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    match state.sessions.issue_session(&request.email, &request.password).await {
        Ok(session) => HttpResponse::Ok().json(session),
        Err(error) => handle_domain_error(&error),
    }
}
