//! Twilio SMS sender
//!
//! - E.164 validation with the `phonenumber` crate
//! - Bounded retry with exponential backoff on rate limits and server errors
//! - Per-request timeout
//! - Phone numbers masked in logs

use async_trait::async_trait;
use phonenumber::{Mode, PhoneNumber};
use std::time::Duration;
use tracing::{debug, error, info, warn};
use twilio::{Client, OutboundMessage};

use us_core::services::verification::SmsSender;
use us_shared::config::SmsConfig;
use us_shared::phone::mask_phone_number;

use crate::InfrastructureError;

/// Twilio's limit for a single message body
const MAX_MESSAGE_LENGTH: usize = 1600;

/// Twilio SMS sender configuration
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// Sender number, must be a Twilio number in E.164 format
    pub from_number: String,
    /// Maximum attempts per message
    pub max_retries: u32,
    /// Initial retry delay in milliseconds
    pub retry_delay_ms: u64,
    /// Timeout for each API request in seconds
    pub request_timeout_secs: u64,
}

impl TwilioConfig {
    /// Build from the shared SMS settings, rejecting incomplete credentials
    pub fn from_sms_config(config: &SmsConfig) -> Result<Self, InfrastructureError> {
        if config.twilio_account_sid.is_empty() {
            return Err(InfrastructureError::Config("TWILIO_ACCOUNT_SID not set".to_string()));
        }
        if config.twilio_auth_token.is_empty() {
            return Err(InfrastructureError::Config("TWILIO_AUTH_TOKEN not set".to_string()));
        }
        if !config.twilio_from_number.starts_with('+') {
            return Err(InfrastructureError::Config(
                "TWILIO_FROM_NUMBER must be in E.164 format (starting with '+')".to_string(),
            ));
        }

        Ok(Self {
            account_sid: config.twilio_account_sid.clone(),
            auth_token: config.twilio_auth_token.clone(),
            from_number: config.twilio_from_number.clone(),
            max_retries: 3,
            retry_delay_ms: 1000,
            request_timeout_secs: config.timeout_seconds,
        })
    }
}

/// Twilio SMS sender
pub struct TwilioSmsSender {
    client: Client,
    config: TwilioConfig,
}

impl TwilioSmsSender {
    pub fn new(config: TwilioConfig) -> Self {
        let client = Client::new(&config.account_sid, &config.auth_token);

        info!(
            from = %mask_phone_number(&config.from_number),
            "Twilio SMS sender initialized"
        );

        Self { client, config }
    }

    /// Validate and normalize a destination number to E.164
    fn validate_phone_number(phone: &str) -> Result<String, InfrastructureError> {
        if !phone.starts_with('+') {
            return Err(InfrastructureError::Sms(
                "Phone number must be in E.164 format (e.g., +14155552671)".to_string(),
            ));
        }

        let parsed = phone
            .parse::<PhoneNumber>()
            .map_err(|e| InfrastructureError::Sms(format!("Invalid phone number format: {}", e)))?;

        Ok(parsed.format().mode(Mode::E164).to_string())
    }

    /// Send with retry on transient failures
    async fn send_with_retry(&self, to: &str, body: &str) -> Result<String, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = Duration::from_millis(self.config.retry_delay_ms);
        let timeout = Duration::from_secs(self.config.request_timeout_secs);

        loop {
            attempts += 1;
            debug!(
                attempt = attempts,
                max_attempts = self.config.max_retries,
                phone = %mask_phone_number(to),
                "Sending SMS via Twilio"
            );

            let message = OutboundMessage::new(&self.config.from_number, to, body);
            let failure = match tokio::time::timeout(timeout, self.client.send_message(message)).await {
                Ok(Ok(response)) => {
                    info!(
                        phone = %mask_phone_number(to),
                        sid = %response.sid,
                        "SMS sent"
                    );
                    return Ok(response.sid);
                }
                Ok(Err(e)) => e.to_string(),
                Err(_) => format!("request timed out after {}s", timeout.as_secs()),
            };

            error!(attempt = attempts, error = %failure, "Failed to send SMS");

            if attempts >= self.config.max_retries || !is_retryable(&failure) {
                return Err(InfrastructureError::Sms(format!(
                    "Failed to send SMS after {} attempt(s): {}",
                    attempts, failure
                )));
            }

            warn!(delay_ms = delay.as_millis() as u64, "Retrying SMS delivery");
            tokio::time::sleep(delay).await;
            delay *= 2;
        }
    }
}

/// Rate limits, server errors and timeouts are worth another attempt
fn is_retryable(failure: &str) -> bool {
    let lower = failure.to_lowercase();
    ["429", "rate", "500", "502", "503", "504", "timed out", "timeout"]
        .iter()
        .any(|marker| lower.contains(marker))
}

#[async_trait]
impl SmsSender for TwilioSmsSender {
    async fn send_sms(&self, phone: &str, body: &str) -> Result<String, String> {
        let to = Self::validate_phone_number(phone).map_err(|e| e.to_string())?;

        if body.len() > MAX_MESSAGE_LENGTH {
            return Err(format!(
                "Message exceeds maximum length of {} characters",
                MAX_MESSAGE_LENGTH
            ));
        }

        self.send_with_retry(&to, body).await.map_err(|e| e.to_string())
    }

    fn provider_name(&self) -> &'static str {
        "Twilio"
    }
}
