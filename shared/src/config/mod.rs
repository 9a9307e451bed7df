//! Configuration module with business-specific sub-modules
//!
//! Every section is a plain struct with sensible defaults and a `from_env()`
//! constructor. Binaries call `dotenvy::dotenv()` first and then
//! [`AppConfig::from_env`].
//!
//! - `auth` - JWT signing and verification-code windows
//! - `database` - MySQL connection pool
//! - `environment` - environment detection and logging
//! - `notification` - task queue, email/SMS providers, background worker
//! - `replication` - post-registration account mirroring
//! - `server` - HTTP listener

pub mod auth;
pub mod database;
pub mod environment;
pub mod notification;
pub mod replication;
pub mod server;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub use auth::{JwtConfig, VerificationConfig};
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use notification::{EmailConfig, EmailProvider, QueueConfig, SmsConfig, SmsProvider, WorkerConfig};
pub use replication::ReplicationConfig;
pub use server::ServerConfig;

/// Minimum accepted length of the JWT signing secret outside development
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub verification: VerificationConfig,
    pub queue: QueueConfig,
    pub email: EmailConfig,
    pub sms: SmsConfig,
    pub worker: WorkerConfig,
    pub replication: ReplicationConfig,
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            jwt: JwtConfig::default(),
            verification: VerificationConfig::default(),
            queue: QueueConfig::default(),
            email: EmailConfig::default(),
            sms: SmsConfig::default(),
            worker: WorkerConfig::default(),
            replication: ReplicationConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load every section from environment variables
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        Self {
            environment,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            jwt: JwtConfig::from_env(),
            verification: VerificationConfig::from_env(),
            queue: QueueConfig::from_env(),
            email: EmailConfig::from_env(),
            sms: SmsConfig::from_env(),
            worker: WorkerConfig::from_env(),
            replication: ReplicationConfig::from_env(),
            logging: LoggingConfig::from_env(environment),
        }
    }

    /// Reject configurations that must never reach production
    pub fn validate(&self) -> Result<(), String> {
        if self.jwt.secret.is_empty() {
            return Err("JWT_SECRET must be set".to_string());
        }
        if !self.environment.is_development() {
            if self.jwt.is_using_default_secret() {
                return Err("JWT_SECRET still has its default value".to_string());
            }
            if self.jwt.secret.len() < MIN_JWT_SECRET_LENGTH {
                return Err(format!(
                    "JWT_SECRET must be at least {} characters",
                    MIN_JWT_SECRET_LENGTH
                ));
            }
        }
        if self.jwt.access_token_expiry <= 0 || self.jwt.refresh_token_expiry <= 0 {
            return Err("token expiry values must be positive".to_string());
        }
        if self.verification.email_code_expiry <= 0 {
            return Err("EMAIL_VERIFICATION_EXPIRY must be positive".to_string());
        }
        Ok(())
    }
}

/// Read `key` from the environment, falling back to `default` when it is
/// missing or does not parse.
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

/// Read a string variable with a default
pub(crate) fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
