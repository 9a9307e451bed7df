use actix_web::{web, HttpResponse};

use us_core::repositories::{AccountRepository, TokenRepository};
use us_shared::types::MessageResponse;

use crate::app::AppState;
use crate::dto::LogoutRequest;
use crate::handlers::error::{handle_domain_error, invalid_body_response};
use crate::middleware::auth::AuthContext;

/// Handler for POST /api/v1/logout
///
/// Requires a Bearer token. With an empty body every session of the caller
/// ends; with `{"refresh_token": "..."}` all access tokens and that refresh
/// token are revoked together, or nothing is if the token is not the caller's.
///
/// ## Errors
/// - 400 Bad Request: A non-empty body that is not a valid logout request
/// - 401 Unauthorized: Missing or invalid access token, or a refresh token
///   that does not belong to the caller
pub async fn logout<A, T>(
    state: web::Data<AppState<A, T>>,
    auth: AuthContext,
    body: web::Bytes,
) -> HttpResponse
where
    A: AccountRepository + 'static,
    T: TokenRepository + 'static,
{
    let request = match parse_body(&body) {
        Ok(request) => request,
        Err(error) => return invalid_body_response(&error),
    };
    let refresh_token = request.refresh_token.as_deref().filter(|token| !token.is_empty());

    match state.sessions.end_session(auth.account_id, refresh_token).await {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::new("Logged out successfully")),
        Err(error) => handle_domain_error(&error),
    }
}

/// An absent body means "no refresh token"; anything else must parse
fn parse_body(body: &[u8]) -> Result<LogoutRequest, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(LogoutRequest::default());
    }
    serde_json::from_slice(body)
}
