use actix_web::{web, HttpResponse};

use us_core::errors::DomainError;
use us_core::repositories::{AccountRepository, TokenRepository};

use crate::app::AppState;
use crate::dto::AccountResponse;
use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::AuthContext;

/// Handler for GET /api/v1/me
pub async fn me<A, T>(state: web::Data<AppState<A, T>>, auth: AuthContext) -> HttpResponse
where
    A: AccountRepository + 'static,
    T: TokenRepository + 'static,
{
    match state.accounts.find_by_id(auth.account_id).await {
        Ok(Some(account)) => HttpResponse::Ok().json(AccountResponse::from(&account)),
        Ok(None) => handle_domain_error(&DomainError::NotFound {
            resource: "account".to_string(),
        }),
        Err(error) => handle_domain_error(&error),
    }
}
