//! Token signing and verification-code configuration

use serde::{Deserialize, Serialize};

use super::{env_or, env_string};

const DEFAULT_SECRET: &str = "your-secret-key-change-in-production";

/// JWT authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Symmetric key used to sign access tokens (HS256)
    pub secret: String,

    /// Access token expiry time in seconds
    pub access_token_expiry: i64,

    /// Refresh token expiry time in seconds
    pub refresh_token_expiry: i64,

    /// JWT issuer claim
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_SECRET),
            access_token_expiry: 3600,     // 1 hour
            refresh_token_expiry: 604800,  // 7 days
            issuer: String::from("user-service"),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            secret: env_string("JWT_SECRET", DEFAULT_SECRET),
            access_token_expiry: env_or("ACCESS_TOKEN_EXPIRY", defaults.access_token_expiry),
            refresh_token_expiry: env_or("REFRESH_TOKEN_EXPIRY", defaults.refresh_token_expiry),
            issuer: env_string("JWT_ISSUER", &defaults.issuer),
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry = days * 86400;
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }
}

/// One-time verification code settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// Lifetime of an email verification code in seconds
    pub email_code_expiry: i64,

    /// Template used for verification emails
    pub email_template_code: String,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            email_code_expiry: 1800, // 30 minutes
            email_template_code: String::from("EMAIL_VERIFICATION"),
        }
    }
}

impl VerificationConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            email_code_expiry: env_or("EMAIL_VERIFICATION_EXPIRY", defaults.email_code_expiry),
            email_template_code: env_string(
                "EMAIL_VERIFICATION_TEMPLATE",
                &defaults.email_template_code,
            ),
        }
    }
}
