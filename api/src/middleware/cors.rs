//! CORS configuration for cross-origin requests.

use actix_cors::Cors;
use actix_web::http::{header, Method};

const PREFLIGHT_MAX_AGE: usize = 3600;

/// Build the CORS middleware from `ServerConfig::allowed_origins`
///
/// A `*` entry (the development default) allows any origin; otherwise only
/// the listed origins are accepted.
pub fn create_cors(allowed_origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
        .max_age(PREFLIGHT_MAX_AGE);

    if allowed_origins.iter().any(|origin| origin.trim() == "*") {
        tracing::info!("CORS allows any origin");
        return cors.allow_any_origin();
    }

    for origin in allowed_origins.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        tracing::info!(origin = %origin, "Adding allowed origin");
        cors = cors.allowed_origin(origin);
    }

    cors
}
