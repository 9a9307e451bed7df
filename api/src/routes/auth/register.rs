use actix_web::{web, HttpResponse};
use validator::Validate;

use us_core::repositories::{AccountRepository, TokenRepository};

use crate::app::AppState;
use crate::dto::{AccountResponse, RegisterRequest};
use crate::handlers::error::{handle_domain_error, validation_error_response};

/// Handler for POST /api/v1/register
///
/// # Request Body
///
/// ```json
/// {
///     "email": "alice@example.com",
///     "password": "Secret123!",
///     "phone": "+14155552671",
///     "first_name": "Alice"
/// }
/// ```
///
/// # Response
///
/// ## Success (201 Created)
/// The stored account, without secrets.
///
/// ## Errors
/// - 400 Bad Request: Malformed email, phone or password
/// - 409 Conflict: Email or phone already registered
pub async fn register<A, T>(
    state: web::Data<AppState<A, T>>,
    request: web::Json<RegisterRequest>,
) -> HttpResponse
where
    A: AccountRepository + 'static,
    T: TokenRepository + 'static,
{
    let request = request.into_inner();
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    match state.registration.register(request.into()).await {
        Ok(account) => HttpResponse::Created().json(AccountResponse::from(&account)),
        Err(error) => handle_domain_error(&error),
    }
}
