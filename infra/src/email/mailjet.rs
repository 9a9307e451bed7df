//! Mailjet v3.1 send API

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;

use us_core::domain::entities::notification::OutgoingEmail;
use us_core::services::notification::EmailTransport;
use us_shared::config::EmailConfig;

use super::{check_response, http_client, recipient_domain};
use crate::InfrastructureError;

const MAILJET_SEND_URL: &str = "https://api.mailjet.com/v3.1/send";

pub struct MailjetTransport {
    client: reqwest::Client,
    api_key: String,
    api_secret: String,
    sender_email: String,
    sender_name: String,
}

impl MailjetTransport {
    pub fn new(config: &EmailConfig) -> Result<Self, InfrastructureError> {
        if config.mailjet_api_key.is_empty() || config.mailjet_api_secret.is_empty() {
            return Err(InfrastructureError::Config(
                "MAILJET_API_KEY and MAILJET_API_SECRET must be set".to_string(),
            ));
        }
        Ok(Self {
            client: http_client(config.timeout_seconds)?,
            api_key: config.mailjet_api_key.clone(),
            api_secret: config.mailjet_api_secret.clone(),
            sender_email: config.sender_email.clone(),
            sender_name: config.sender_name.clone(),
        })
    }

    fn payload(&self, email: &OutgoingEmail) -> Value {
        json!({
            "Messages": [{
                "From": { "Email": self.sender_email, "Name": self.sender_name },
                "To": [{ "Email": email.recipient }],
                "Subject": email.subject,
                "TextPart": email.body,
            }]
        })
    }
}

#[async_trait]
impl EmailTransport for MailjetTransport {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), String> {
        let response = self
            .client
            .post(MAILJET_SEND_URL)
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .json(&self.payload(email))
            .send()
            .await
            .map_err(|e| format!("Mailjet request failed: {}", e))?;

        check_response("Mailjet", response).await?;
        info!(recipient_domain = recipient_domain(&email.recipient), "Email sent via Mailjet");
        Ok(())
    }
}
