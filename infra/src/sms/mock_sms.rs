//! Mock SMS sender for development and tests

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tracing::info;
use uuid::Uuid;

use us_core::services::verification::SmsSender;
use us_shared::phone::{is_valid_international_phone, mask_phone_number};

/// A message accepted by [`MockSmsSender`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentSms {
    pub message_id: String,
    pub phone: String,
    pub body: String,
}

/// Accepts every well-formed number and keeps the messages in memory
#[derive(Clone, Default)]
pub struct MockSmsSender {
    sent: Arc<Mutex<Vec<SentSms>>>,
    simulate_failure: bool,
}

impl MockSmsSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sender that rejects every message
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            ..Self::default()
        }
    }

    /// Messages accepted so far, oldest first
    pub fn sent_messages(&self) -> Vec<SentSms> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    /// Most recent message sent to `phone`
    pub fn last_message_to(&self, phone: &str) -> Option<SentSms> {
        self.sent_messages().into_iter().rev().find(|m| m.phone == phone)
    }
}

#[async_trait]
impl SmsSender for MockSmsSender {
    async fn send_sms(&self, phone: &str, body: &str) -> Result<String, String> {
        if !is_valid_international_phone(phone) {
            return Err(format!("Invalid phone number format: {}", mask_phone_number(phone)));
        }
        if self.simulate_failure {
            return Err("Simulated SMS failure".to_string());
        }

        let message_id = format!("mock-{}", Uuid::new_v4());
        info!(
            phone = %mask_phone_number(phone),
            message_id = %message_id,
            length = body.len(),
            "Mock SMS accepted"
        );

        if let Ok(mut sent) = self.sent.lock() {
            sent.push(SentSms {
                message_id: message_id.clone(),
                phone: phone.to_string(),
                body: body.to_string(),
            });
        }
        Ok(message_id)
    }

    fn provider_name(&self) -> &'static str {
        "Mock"
    }
}
