//! Notification delivery configuration: task queue, providers and worker

use serde::{Deserialize, Serialize};

use super::{env_or, env_string};

/// Durable task queue (Redis list) settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueueConfig {
    /// Redis connection URL
    pub url: String,

    /// Name of the queue carrying email delivery tasks
    pub email_queue: String,

    /// Seconds a blocking receive waits before returning empty-handed
    pub receive_timeout: u64,

    /// Connection timeout in seconds
    pub connection_timeout: u64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            url: String::from("redis://localhost:6379"),
            email_queue: String::from("email_queue"),
            receive_timeout: 2,
            connection_timeout: 5,
        }
    }
}

impl QueueConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: env_string("REDIS_URL", &defaults.url),
            email_queue: env_string("EMAIL_QUEUE", &defaults.email_queue),
            receive_timeout: env_or("QUEUE_RECEIVE_TIMEOUT", defaults.receive_timeout),
            connection_timeout: env_or("REDIS_CONNECTION_TIMEOUT", defaults.connection_timeout),
        }
    }
}

/// Outbound email provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailProvider {
    /// Log the rendered message instead of sending it
    Log,
    Sendgrid,
    Mailjet,
}

impl std::str::FromStr for EmailProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "log" | "mock" => Ok(EmailProvider::Log),
            "sendgrid" => Ok(EmailProvider::Sendgrid),
            "mailjet" => Ok(EmailProvider::Mailjet),
            _ => Err(format!("Unknown email provider: {}", s)),
        }
    }
}

/// Email transport settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    pub provider: EmailProvider,

    /// Address used in the `From` header
    pub sender_email: String,

    /// Display name used in the `From` header
    pub sender_name: String,

    /// SendGrid API key
    #[serde(default)]
    pub sendgrid_api_key: String,

    /// Mailjet API key and secret
    #[serde(default)]
    pub mailjet_api_key: String,
    #[serde(default)]
    pub mailjet_api_secret: String,

    /// Request timeout for provider calls in seconds
    pub timeout_seconds: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            provider: EmailProvider::Log,
            sender_email: String::from("no-reply@localhost"),
            sender_name: String::from("User Service"),
            sendgrid_api_key: String::new(),
            mailjet_api_key: String::new(),
            mailjet_api_secret: String::new(),
            timeout_seconds: 10,
        }
    }
}

impl EmailConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            provider: env_or("EMAIL_PROVIDER", defaults.provider),
            sender_email: env_string("EMAIL_SENDER", &defaults.sender_email),
            sender_name: env_string("EMAIL_SENDER_NAME", &defaults.sender_name),
            sendgrid_api_key: env_string("SENDGRID_API_KEY", ""),
            mailjet_api_key: env_string("MAILJET_API_KEY", ""),
            mailjet_api_secret: env_string("MAILJET_API_SECRET", ""),
            timeout_seconds: env_or("EMAIL_TIMEOUT_SECONDS", defaults.timeout_seconds),
        }
    }
}

/// Outbound SMS provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SmsProvider {
    Mock,
    Twilio,
}

impl std::str::FromStr for SmsProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mock" | "log" => Ok(SmsProvider::Mock),
            "twilio" => Ok(SmsProvider::Twilio),
            _ => Err(format!("Unknown SMS provider: {}", s)),
        }
    }
}

/// SMS transport settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmsConfig {
    pub provider: SmsProvider,
    #[serde(default)]
    pub twilio_account_sid: String,
    #[serde(default)]
    pub twilio_auth_token: String,
    /// Sender number in E.164 format
    #[serde(default)]
    pub twilio_from_number: String,
    pub timeout_seconds: u64,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            provider: SmsProvider::Mock,
            twilio_account_sid: String::new(),
            twilio_auth_token: String::new(),
            twilio_from_number: String::new(),
            timeout_seconds: 10,
        }
    }
}

impl SmsConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            provider: env_or("SMS_PROVIDER", defaults.provider),
            twilio_account_sid: env_string("TWILIO_ACCOUNT_SID", ""),
            twilio_auth_token: env_string("TWILIO_AUTH_TOKEN", ""),
            twilio_from_number: env_string("TWILIO_FROM_NUMBER", ""),
            timeout_seconds: env_or("SMS_TIMEOUT_SECONDS", defaults.timeout_seconds),
        }
    }
}

/// Background worker settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkerConfig {
    /// Run the notification worker inside the API process
    pub enabled: bool,

    /// Seconds granted to in-flight work after a shutdown signal
    pub shutdown_grace_seconds: u64,

    /// Purge expired tokens in the background, independent of `enabled`
    pub token_cleanup_enabled: bool,

    /// Interval between expired token purges in seconds
    pub token_cleanup_interval: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            shutdown_grace_seconds: 5,
            token_cleanup_enabled: true,
            token_cleanup_interval: 3600,
        }
    }
}

impl WorkerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: env_or("WORKER_ENABLED", defaults.enabled),
            shutdown_grace_seconds: env_or("SHUTDOWN_GRACE_SECONDS", defaults.shutdown_grace_seconds),
            token_cleanup_enabled: env_or("TOKEN_CLEANUP_ENABLED", defaults.token_cleanup_enabled),
            token_cleanup_interval: env_or("TOKEN_CLEANUP_INTERVAL", defaults.token_cleanup_interval),
        }
    }
}
