//! Secondary datastore mirroring

use serde::{Deserialize, Serialize};

use super::{env_or, env_string};

/// Where newly registered accounts are mirrored after commit
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReplicationConfig {
    /// Endpoint receiving account snapshots; unset disables mirroring
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for ReplicationConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_seconds: 5,
        }
    }
}

impl ReplicationConfig {
    pub fn from_env() -> Self {
        let webhook_url = Some(env_string("ACCOUNT_REPLICATION_URL", ""))
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        Self {
            webhook_url,
            timeout_seconds: env_or("ACCOUNT_REPLICATION_TIMEOUT", Self::default().timeout_seconds),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.webhook_url.is_some()
    }
}
