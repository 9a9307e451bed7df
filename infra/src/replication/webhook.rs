//! HTTP webhook mirror

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

use us_core::domain::entities::account::Account;
use us_core::services::registration::AccountReplicator;

use crate::InfrastructureError;

/// Public view of an account sent to the mirror; credentials and pending
/// verification digests stay in the primary store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSnapshot {
    pub id: Uuid,
    pub email: String,
    pub phone: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email_verified: bool,
    pub phone_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountSnapshot {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            email: account.email.clone(),
            phone: account.phone.clone(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            email_verified: account.email_verified,
            phone_verified: account.phone_verified,
            created_at: account.created_at,
        }
    }
}

/// POSTs an [`AccountSnapshot`] as JSON to a fixed URL
pub struct WebhookReplicator {
    client: reqwest::Client,
    url: String,
}

impl WebhookReplicator {
    pub fn new(url: &str, timeout_seconds: u64) -> Result<Self, InfrastructureError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|e| InfrastructureError::Config(format!("Invalid replication URL: {}", e)))?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            url: parsed.to_string(),
        })
    }
}

#[async_trait]
impl AccountReplicator for WebhookReplicator {
    async fn replicate(&self, account: &Account) -> Result<(), String> {
        let response = self
            .client
            .post(&self.url)
            .json(&AccountSnapshot::from(account))
            .send()
            .await
            .map_err(|e| format!("replication request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("replication endpoint responded with {}", status));
        }

        debug!(account_id = %account.id, "Account replicated");
        Ok(())
    }
}
