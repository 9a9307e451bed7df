//! Configuration for the token service

use chrono::Duration;
use us_shared::{JwtConfig, WorkerConfig};

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// HS256 signing secret
    pub jwt_secret: String,
    /// Issuer claim written into and required from every access token
    pub issuer: String,
    /// Access token lifetime in seconds
    pub access_token_ttl_seconds: i64,
    /// Refresh token lifetime in seconds
    pub refresh_token_ttl_seconds: i64,
}

impl TokenServiceConfig {
    pub fn access_ttl(&self) -> Duration {
        Duration::seconds(self.access_token_ttl_seconds)
    }

    pub fn refresh_ttl(&self) -> Duration {
        Duration::seconds(self.refresh_token_ttl_seconds)
    }
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self::from(&JwtConfig::default())
    }
}

impl From<&JwtConfig> for TokenServiceConfig {
    fn from(config: &JwtConfig) -> Self {
        Self {
            jwt_secret: config.secret.clone(),
            issuer: config.issuer.clone(),
            access_token_ttl_seconds: config.access_token_expiry,
            refresh_token_ttl_seconds: config.refresh_token_expiry,
        }
    }
}

/// Configuration for the expired token purge
#[derive(Debug, Clone)]
pub struct TokenCleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    /// Whether to enable automatic cleanup
    pub enabled: bool,
}

impl Default for TokenCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600,
            enabled: true,
        }
    }
}

impl From<&WorkerConfig> for TokenCleanupConfig {
    fn from(config: &WorkerConfig) -> Self {
        Self {
            interval_seconds: config.token_cleanup_interval,
            enabled: config.token_cleanup_enabled,
        }
    }
}
