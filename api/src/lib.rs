//! # User Service HTTP API
//!
//! Actix-web surface of the user account service. Handlers are thin: they
//! validate the request body, call one service from `us_core` and translate
//! the outcome into JSON. Bearer authentication is enforced by the
//! [`middleware::auth::JwtAuth`] middleware on protected routes.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod telemetry;

pub use app::{create_app, AppState};
