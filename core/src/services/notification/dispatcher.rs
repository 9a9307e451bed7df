use std::sync::Arc;
use tracing::{debug, error};

use crate::domain::entities::notification::VerificationTask;
use crate::errors::NotificationError;

use super::traits::TaskQueue;

/// Publishes verification tasks onto a named queue
pub struct NotificationDispatcher {
    queue: Arc<dyn TaskQueue>,
    queue_name: String,
}

impl NotificationDispatcher {
    pub fn new(queue: Arc<dyn TaskQueue>, queue_name: impl Into<String>) -> Self {
        Self {
            queue,
            queue_name: queue_name.into(),
        }
    }

    pub fn queue_name(&self) -> &str {
        &self.queue_name
    }

    /// Serialize and publish a task
    ///
    /// Failures are returned to the caller so the request can report that the
    /// code was not sent.
    pub async fn dispatch(&self, task: &VerificationTask) -> Result<(), NotificationError> {
        let payload = task.to_bytes()?;
        self.publish_raw(payload).await?;

        debug!(
            queue = %self.queue_name,
            template_code = %task.template_code,
            "Verification task published"
        );
        Ok(())
    }

    /// Publish an already serialized payload
    ///
    /// # Returns
    /// * `Err(NotificationError::EmptyTask)` - `payload` is empty; nothing is
    ///   published
    /// * `Err(NotificationError::EmailTaskPublishingFailed)` - The queue
    ///   rejected the payload
    pub async fn publish_raw(&self, payload: Vec<u8>) -> Result<(), NotificationError> {
        if payload.is_empty() {
            return Err(NotificationError::EmptyTask);
        }

        self.queue
            .publish(&self.queue_name, payload)
            .await
            .map_err(|reason| {
                error!(queue = %self.queue_name, error = %reason, "Failed to publish task");
                NotificationError::EmailTaskPublishingFailed { reason }
            })
    }
}
