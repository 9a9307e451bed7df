//! Bearer authentication middleware for protecting API endpoints.
//!
//! The raw `Authorization` header is handed to a [`BearerValidator`], which
//! checks the signature, the expiry and that the token is still stored. On
//! success the owning account is injected into the request as an
//! [`AuthContext`]; any authentication failure short-circuits with a JSON 401.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    http::header::AUTHORIZATION,
    Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use uuid::Uuid;

use us_core::errors::{AuthError, DomainError};
use us_core::services::session::BearerValidator;

use crate::handlers::error::handle_domain_error;

/// Authenticated caller, available to handlers as an extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub account_id: Uuid,
}

/// Bearer authentication middleware factory
#[derive(Clone)]
pub struct JwtAuth {
    validator: Arc<dyn BearerValidator>,
}

impl JwtAuth {
    pub fn new(validator: Arc<dyn BearerValidator>) -> Self {
        Self { validator }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            validator: Arc::clone(&self.validator),
        }))
    }
}

/// Bearer authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    validator: Arc<dyn BearerValidator>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let validator = Arc::clone(&self.validator);

        Box::pin(async move {
            let authorization = authorization_header(&req);

            let account_id = match validator.validate_bearer(authorization.as_deref()).await {
                Ok(account_id) => account_id,
                Err(error) => {
                    return Ok(req.into_response(rejection(error)).map_into_right_body());
                }
            };

            req.extensions_mut().insert(AuthContext { account_id });
            service.call(req).await.map(ServiceResponse::map_into_left_body)
        })
    }
}

/// Raw `Authorization` value; scheme handling is left to the validator
fn authorization_header(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()
        .map(str::to_string)
}

/// JSON response for a failed validation
///
/// Store failures keep their 500 status; every other failure is a uniform 401.
fn rejection(error: DomainError) -> HttpResponse {
    let error = if error.is_authentication_failure()
        || matches!(error, DomainError::DatabaseOperationFailed { .. } | DomainError::Internal { .. })
    {
        error
    } else {
        AuthError::Unauthorized.into()
    };

    handle_domain_error(&error)
}

impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .copied()
            .ok_or_else(|| ErrorUnauthorized("Authentication required"));

        ready(result)
    }
}
