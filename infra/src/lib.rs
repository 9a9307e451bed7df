//! # Infrastructure Layer
//!
//! Concrete adapters for the ports declared in `us_core`:
//! - **Database**: MySQL account, token and template stores using SQLx
//! - **Queue**: Redis list backed task queue for notification delivery
//! - **SMS**: Twilio and a logging mock
//! - **Email**: SendGrid and Mailjet over HTTP, plus a logging transport
//! - **Replication**: webhook mirror for newly registered accounts
//! - **Memory**: in-process adapters for tests and local runs
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)
//! - `redis-queue`: Enable the Redis task queue (default)
//! - `twilio-sms`: Enable the Twilio SMS sender (default)

// Re-export core types for convenience
pub use us_core::errors::*;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Task queue implementations
pub mod queue;

/// SMS senders
pub mod sms;

/// Email transports
pub mod email;

/// Secondary datastore mirroring
pub mod replication;

/// In-memory adapters
pub mod memory;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Database migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Redis queue error
    #[error("Queue error: {0}")]
    Queue(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// SMS service error
    #[error("SMS service error: {0}")]
    Sms(String),

    /// Email service error
    #[error("Email service error: {0}")]
    Email(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Database(e) => DomainError::database(e.to_string()),
            other => DomainError::Internal {
                message: other.to_string(),
            },
        }
    }
}
