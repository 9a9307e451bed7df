//! Application state and factory
//!
//! [`AppState`] holds the services shared by every worker thread and
//! [`create_app`] assembles the route table around it. Both are generic over
//! the account and token stores so the integration tests can run the real
//! handlers against in-memory adapters.

use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, Error, HttpResponse,
};
use tracing_actix_web::TracingLogger;

use us_core::repositories::{AccountRepository, TokenRepository};
use us_core::services::registration::RegistrationService;
use us_core::services::session::{BearerValidator, SessionService};
use us_core::services::verification::VerificationService;
use us_infra::database::DatabasePool;
use us_shared::types::ErrorResponse;

use crate::handlers::error::json_error_handler;
use crate::middleware::{auth::JwtAuth, cors::create_cors};
use crate::routes::{
    account::me,
    auth::{login, logout, refresh_token, register},
    verification::{confirm_email_code, confirm_phone_code, send_email_code, send_phone_code},
};

/// Services shared by all request handlers
pub struct AppState<A, T>
where
    A: AccountRepository,
    T: TokenRepository,
{
    pub sessions: Arc<SessionService<A, T>>,
    pub verification: Arc<VerificationService<A>>,
    pub registration: Arc<RegistrationService<A>>,
    pub accounts: Arc<A>,
    /// Probed by `/health` when present
    pub database: Option<DatabasePool>,
}

/// Create and configure the application with all dependencies
pub fn create_app<A, T>(
    state: web::Data<AppState<A, T>>,
    allowed_origins: &[String],
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
>
where
    A: AccountRepository + 'static,
    T: TokenRepository + 'static,
{
    let validator: Arc<dyn BearerValidator> = state.sessions.clone();
    let auth = JwtAuth::new(validator);

    App::new()
        .app_data(state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(create_cors(allowed_origins))
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check::<A, T>))
        .service(
            web::scope("/api/v1")
                .route("/register", web::post().to(register::<A, T>))
                .route("/login", web::post().to(login::<A, T>))
                .route("/token/refresh", web::post().to(refresh_token::<A, T>))
                .route("/logout", web::post().to(logout::<A, T>).wrap(auth.clone()))
                .route(
                    "/verify-email/send",
                    web::post().to(send_email_code::<A, T>).wrap(auth.clone()),
                )
                .route(
                    "/verify-email/confirm",
                    web::post().to(confirm_email_code::<A, T>).wrap(auth.clone()),
                )
                .route(
                    "/verify-phone/send",
                    web::post().to(send_phone_code::<A, T>).wrap(auth.clone()),
                )
                .route(
                    "/verify-phone/confirm",
                    web::post().to(confirm_phone_code::<A, T>).wrap(auth.clone()),
                )
                .route("/me", web::get().to(me::<A, T>).wrap(auth)),
        )
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check<A, T>(state: web::Data<AppState<A, T>>) -> HttpResponse
where
    A: AccountRepository + 'static,
    T: TokenRepository + 'static,
{
    let database = match &state.database {
        Some(pool) => match pool.health_check().await {
            Ok(true) => "up",
            Ok(false) => "down",
            Err(e) => {
                tracing::warn!(error = %e, "Database health check failed");
                "down"
            }
        },
        None => "not_configured",
    };

    let body = serde_json::json!({
        "status": if database == "down" { "unhealthy" } else { "healthy" },
        "service": "user-service",
        "version": env!("CARGO_PKG_VERSION"),
        "database": database,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    if database == "down" {
        HttpResponse::ServiceUnavailable().json(body)
    } else {
        HttpResponse::Ok().json(body)
    }
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        "not_found",
        "The requested resource was not found",
    ))
}
