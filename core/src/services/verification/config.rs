//! Configuration for the verification service

use chrono::Duration;
use us_shared::VerificationConfig;

/// Configuration for the verification service
#[derive(Debug, Clone)]
pub struct VerificationServiceConfig {
    /// Lifetime of an email verification code in seconds
    pub email_code_expiry_seconds: i64,
    /// Template used for verification emails
    pub email_template_code: String,
}

impl VerificationServiceConfig {
    pub fn email_code_ttl(&self) -> Duration {
        Duration::seconds(self.email_code_expiry_seconds)
    }
}

impl Default for VerificationServiceConfig {
    fn default() -> Self {
        Self::from(&VerificationConfig::default())
    }
}

impl From<&VerificationConfig> for VerificationServiceConfig {
    fn from(config: &VerificationConfig) -> Self {
        Self {
            email_code_expiry_seconds: config.email_code_expiry,
            email_template_code: config.email_template_code.clone(),
        }
    }
}
