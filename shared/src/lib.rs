//! Shared utilities and common types for the user account service
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - Response envelopes returned by the HTTP layer
//! - Utility functions (email, password and phone validation)

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, DatabaseConfig, EmailConfig, EmailProvider, Environment, JwtConfig,
    LogFormat, LoggingConfig, QueueConfig, ReplicationConfig, ServerConfig, SmsConfig, SmsProvider,
    VerificationConfig, WorkerConfig,
};
pub use types::{ApiResponse, ErrorResponse, MessageResponse};
pub use utils::{phone, validation};
