//! Account replicators
//!
//! Mirrors run after the primary insert committed; their failures are logged
//! by the registration service and never undo the account.

use std::sync::Arc;

use us_core::services::registration::{AccountReplicator, NoopReplicator};
use us_shared::config::ReplicationConfig;

use crate::InfrastructureError;

pub mod webhook;

pub use webhook::{AccountSnapshot, WebhookReplicator};

/// Webhook mirror when a URL is configured, otherwise a no-op
pub fn create_replicator(
    config: &ReplicationConfig,
) -> Result<Arc<dyn AccountReplicator>, InfrastructureError> {
    match config.webhook_url.as_deref() {
        Some(url) => Ok(Arc::new(WebhookReplicator::new(url, config.timeout_seconds)?)),
        None => Ok(Arc::new(NoopReplicator)),
    }
}
