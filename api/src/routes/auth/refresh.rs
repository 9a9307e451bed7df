use actix_web::{web, HttpResponse};
use validator::Validate;

use us_core::repositories::{AccountRepository, TokenRepository};

use crate::app::AppState;
use crate::dto::RefreshTokenRequest;
use crate::handlers::error::{handle_domain_error, validation_error_response};

/// Handler for POST /api/v1/token/refresh
///
/// Trades a live refresh token for an access token. The refresh token in the
/// response is the one that was presented.
///
/// ## Errors
/// - 401 Unauthorized: Unknown, expired or revoked refresh token
pub async fn refresh_token<A, T>(
    state: web::Data<AppState<A, T>>,
    request: web::Json<RefreshTokenRequest>,
) -> HttpResponse
where
    A: AccountRepository + 'static,
    T: TokenRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    match state.sessions.refresh_session(&request.refresh_token).await {
        Ok(session) => HttpResponse::Ok().json(session),
        Err(error) => handle_domain_error(&error),
    }
}
