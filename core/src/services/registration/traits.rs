use async_trait::async_trait;

use crate::domain::entities::account::Account;

/// Mirrors newly registered accounts into a secondary datastore
///
/// Called only after the primary insert committed; a failure is logged and
/// never undoes the registration.
#[async_trait]
pub trait AccountReplicator: Send + Sync {
    async fn replicate(&self, account: &Account) -> Result<(), String>;
}

/// Replicator used when no secondary store is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReplicator;

#[async_trait]
impl AccountReplicator for NoopReplicator {
    async fn replicate(&self, _account: &Account) -> Result<(), String> {
        Ok(())
    }
}
