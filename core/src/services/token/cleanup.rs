//! Periodic purge of expired access and refresh tokens
//!
//! Expired rows are already inert for validation; purging only keeps the
//! token tables small.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::errors::DomainResult;
use crate::repositories::TokenRepository;

use super::config::TokenCleanupConfig;

/// Service for cleaning up expired tokens
pub struct TokenCleanupService<R: TokenRepository + 'static> {
    repository: Arc<R>,
    config: TokenCleanupConfig,
}

impl<R: TokenRepository> TokenCleanupService<R> {
    pub fn new(repository: Arc<R>, config: TokenCleanupConfig) -> Self {
        Self { repository, config }
    }

    /// Run a single cleanup cycle
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of rows removed
    /// * `Err(DomainError)` - If the store rejected the delete
    pub async fn run_cleanup(&self) -> DomainResult<u64> {
        if !self.config.enabled {
            return Ok(0);
        }

        let deleted = self.repository.delete_expired(Utc::now()).await?;
        info!(deleted, event = "token_cleanup", "Expired tokens purged");
        Ok(deleted)
    }

    /// Start the cleanup loop as a background task
    ///
    /// The loop ends when `shutdown` is cancelled. A failed cycle is logged and
    /// retried on the next tick.
    pub fn start(self: Arc<Self>, shutdown: CancellationToken) -> Option<JoinHandle<()>> {
        if !self.config.enabled {
            warn!("Token cleanup service is disabled");
            return None;
        }

        let period = Duration::from_secs(self.config.interval_seconds.max(1));

        Some(tokio::spawn(async move {
            info!(
                interval_seconds = self.config.interval_seconds,
                "Token cleanup service started"
            );

            let mut interval_timer = tokio::time::interval(period);

            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = interval_timer.tick() => {
                        if let Err(e) = self.run_cleanup().await {
                            error!(error = %e, "Token cleanup cycle failed");
                        }
                    }
                }
            }

            info!("Token cleanup service stopped");
        }))
    }
}
