//! Ports for queue and email delivery

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::entities::notification::OutgoingEmail;

/// Durable FIFO shared by dispatchers and workers
#[async_trait]
pub trait TaskQueue: Send + Sync {
    /// Append a payload to the named queue
    async fn publish(&self, queue: &str, payload: Vec<u8>) -> Result<(), String>;

    /// Pop the oldest payload, waiting at most `timeout`
    ///
    /// `Ok(None)` means the wait elapsed with nothing to deliver. Once a
    /// payload is returned it has left the queue.
    async fn receive(&self, queue: &str, timeout: Duration) -> Result<Option<Vec<u8>>, String>;
}

/// Outbound email transport
#[async_trait]
pub trait EmailTransport: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), String>;
}
