//! # User Service Core
//!
//! Domain layer of the user account service: credential verification, session
//! token issuance and revocation, one-time verification codes, and the
//! notification dispatch path that hands slow deliveries to a background worker.
//!
//! Persistence and delivery are reached only through the traits in
//! [`repositories`] and the `traits` modules of each service, so every
//! collaborator is injected at construction time.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
