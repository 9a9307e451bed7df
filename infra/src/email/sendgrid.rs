//! SendGrid v3 mail send API

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;

use us_core::domain::entities::notification::OutgoingEmail;
use us_core::services::notification::EmailTransport;
use us_shared::config::EmailConfig;

use super::{check_response, http_client, recipient_domain};
use crate::InfrastructureError;

const SENDGRID_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

pub struct SendgridTransport {
    client: reqwest::Client,
    api_key: String,
    sender_email: String,
    sender_name: String,
}

impl SendgridTransport {
    pub fn new(config: &EmailConfig) -> Result<Self, InfrastructureError> {
        if config.sendgrid_api_key.is_empty() {
            return Err(InfrastructureError::Config("SENDGRID_API_KEY not set".to_string()));
        }
        Ok(Self {
            client: http_client(config.timeout_seconds)?,
            api_key: config.sendgrid_api_key.clone(),
            sender_email: config.sender_email.clone(),
            sender_name: config.sender_name.clone(),
        })
    }

    fn payload(&self, email: &OutgoingEmail) -> Value {
        json!({
            "personalizations": [{ "to": [{ "email": email.recipient }] }],
            "from": { "email": self.sender_email, "name": self.sender_name },
            "subject": email.subject,
            "content": [{ "type": "text/plain", "value": email.body }],
        })
    }
}

#[async_trait]
impl EmailTransport for SendgridTransport {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), String> {
        let response = self
            .client
            .post(SENDGRID_SEND_URL)
            .bearer_auth(&self.api_key)
            .json(&self.payload(email))
            .send()
            .await
            .map_err(|e| format!("SendGrid request failed: {}", e))?;

        check_response("SendGrid", response).await?;
        info!(recipient_domain = recipient_domain(&email.recipient), "Email sent via SendGrid");
        Ok(())
    }
}
