//! In-memory task queue

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::Instant;

use us_core::services::notification::TaskQueue;

/// FIFO queues keyed by name with a blocking receive
#[derive(Clone, Default)]
pub struct InMemoryTaskQueue {
    queues: Arc<Mutex<HashMap<String, VecDeque<Vec<u8>>>>>,
    published: Arc<Notify>,
}

impl InMemoryTaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn pop(&self, queue: &str) -> Result<Option<Vec<u8>>, String> {
        let mut queues = self.queues.lock().map_err(|_| "queue lock poisoned".to_string())?;
        Ok(queues.get_mut(queue).and_then(VecDeque::pop_front))
    }

    /// Number of payloads waiting in `queue`
    pub fn pending(&self, queue: &str) -> usize {
        self.queues
            .lock()
            .map(|queues| queues.get(queue).map_or(0, VecDeque::len))
            .unwrap_or(0)
    }

    /// Remove and return every waiting payload, oldest first
    pub fn drain(&self, queue: &str) -> Vec<Vec<u8>> {
        self.queues
            .lock()
            .map(|mut queues| {
                queues
                    .get_mut(queue)
                    .map(|q| q.drain(..).collect())
                    .unwrap_or_default()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl TaskQueue for InMemoryTaskQueue {
    async fn publish(&self, queue: &str, payload: Vec<u8>) -> Result<(), String> {
        {
            let mut queues = self.queues.lock().map_err(|_| "queue lock poisoned".to_string())?;
            queues.entry(queue.to_string()).or_default().push_back(payload);
        }
        self.published.notify_waiters();
        Ok(())
    }

    async fn receive(&self, queue: &str, timeout: Duration) -> Result<Option<Vec<u8>>, String> {
        let deadline = Instant::now() + timeout;
        loop {
            // Register before checking so a publish in between is not missed
            let notified = self.published.notified();
            if let Some(payload) = self.pop(queue)? {
                return Ok(Some(payload));
            }
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return self.pop(queue);
            }
        }
    }
}
