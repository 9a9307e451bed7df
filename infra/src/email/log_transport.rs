//! Development transport that logs instead of sending

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tracing::info;

use us_core::domain::entities::notification::OutgoingEmail;
use us_core::services::notification::EmailTransport;

use super::recipient_domain;

/// Logs each message and keeps it in memory for inspection
#[derive(Clone, Default)]
pub struct LogEmailTransport {
    delivered: Arc<Mutex<Vec<OutgoingEmail>>>,
}

impl LogEmailTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages handled so far, oldest first
    pub fn delivered(&self) -> Vec<OutgoingEmail> {
        self.delivered.lock().map(|d| d.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl EmailTransport for LogEmailTransport {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), String> {
        info!(
            recipient_domain = recipient_domain(&email.recipient),
            subject = %email.subject,
            "Email delivery stub"
        );
        if let Ok(mut delivered) = self.delivered.lock() {
            delivered.push(email.clone());
        }
        Ok(())
    }
}
