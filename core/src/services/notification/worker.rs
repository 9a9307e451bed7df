//! Notification worker: consumes verification tasks and sends email.
//!
//! One long-lived consumer per queue, independent of request handling.
//!
//! ```text
//! NotificationWorker
//!     │
//!     ├─► receive(queue, timeout)        nothing → poll again
//!     ├─► skip empty / undecodable payloads
//!     ├─► load template by code, render
//!     └─► EmailTransport::send           failure → log and drop
//! ```
//!
//! A payload is only taken off the queue by `receive`, and the shutdown signal
//! is checked between receives, so a message that was received is always
//! processed before the loop exits.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::domain::entities::notification::VerificationTask;
use crate::repositories::TemplateRepository;

use super::template::render_email;
use super::traits::{EmailTransport, TaskQueue};

/// Pause after the queue itself fails, before polling again
const RECEIVE_ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// Configuration for the notification worker
#[derive(Debug, Clone)]
pub struct NotificationWorkerConfig {
    pub queue_name: String,
    /// Longest single blocking receive; bounds shutdown latency
    pub receive_timeout: Duration,
}

impl Default for NotificationWorkerConfig {
    fn default() -> Self {
        Self {
            queue_name: "email_queue".to_string(),
            receive_timeout: Duration::from_secs(2),
        }
    }
}

/// What happened to one delivered payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOutcome {
    /// Rendered and accepted by the transport
    Delivered,
    /// Empty or malformed payload, dropped
    Skipped,
    /// Template or transport failure, dropped
    Failed,
}

/// Counters reported when the worker stops
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorkerStats {
    pub delivered: u64,
    pub skipped: u64,
    pub failed: u64,
}

impl WorkerStats {
    fn record(&mut self, outcome: MessageOutcome) {
        match outcome {
            MessageOutcome::Delivered => self.delivered += 1,
            MessageOutcome::Skipped => self.skipped += 1,
            MessageOutcome::Failed => self.failed += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.delivered + self.skipped + self.failed
    }
}

pub struct NotificationWorker {
    queue: Arc<dyn TaskQueue>,
    templates: Arc<dyn TemplateRepository>,
    transport: Arc<dyn EmailTransport>,
    config: NotificationWorkerConfig,
}

impl NotificationWorker {
    pub fn new(
        queue: Arc<dyn TaskQueue>,
        templates: Arc<dyn TemplateRepository>,
        transport: Arc<dyn EmailTransport>,
        config: NotificationWorkerConfig,
    ) -> Self {
        Self {
            queue,
            templates,
            transport,
            config,
        }
    }

    /// Handle one payload; never fails, the outcome says what happened
    pub async fn process_message(&self, payload: &[u8]) -> MessageOutcome {
        if payload.is_empty() {
            warn!(queue = %self.config.queue_name, "Skipping empty message");
            return MessageOutcome::Skipped;
        }

        let task = match VerificationTask::from_bytes(payload) {
            Ok(task) => task,
            Err(e) => {
                warn!(queue = %self.config.queue_name, error = %e, "Skipping malformed message");
                return MessageOutcome::Skipped;
            }
        };

        let template = match self.templates.find_by_code(&task.template_code).await {
            Ok(Some(template)) => template,
            Ok(None) => {
                error!(template_code = %task.template_code, "Email template not found");
                return MessageOutcome::Failed;
            }
            Err(e) => {
                error!(template_code = %task.template_code, error = %e, "Failed to load email template");
                return MessageOutcome::Failed;
            }
        };

        let email = match render_email(&template, &task) {
            Ok(email) => email,
            Err(e) => {
                error!(template_code = %task.template_code, error = %e, "Failed to render email");
                return MessageOutcome::Failed;
            }
        };

        match self.transport.send(&email).await {
            Ok(()) => {
                info!(
                    template_code = %task.template_code,
                    event = "email_sent",
                    "Notification email sent"
                );
                MessageOutcome::Delivered
            }
            Err(e) => {
                error!(template_code = %task.template_code, error = %e, "Email transport failed");
                MessageOutcome::Failed
            }
        }
    }

    /// Consume until `shutdown` is cancelled
    ///
    /// No per-message failure ends the loop.
    pub async fn run(&self, shutdown: CancellationToken) -> WorkerStats {
        info!(queue = %self.config.queue_name, "Notification worker starting");
        let mut stats = WorkerStats::default();

        while !shutdown.is_cancelled() {
            let received = self
                .queue
                .receive(&self.config.queue_name, self.config.receive_timeout)
                .await;

            match received {
                Ok(Some(payload)) => stats.record(self.process_message(&payload).await),
                Ok(None) => debug!(queue = %self.config.queue_name, "No message"),
                Err(e) => {
                    error!(queue = %self.config.queue_name, error = %e, "Failed to receive message");
                    tokio::select! {
                        _ = shutdown.cancelled() => {}
                        _ = tokio::time::sleep(RECEIVE_ERROR_BACKOFF) => {}
                    }
                }
            }
        }

        info!(
            queue = %self.config.queue_name,
            delivered = stats.delivered,
            skipped = stats.skipped,
            failed = stats.failed,
            "Notification worker stopped"
        );
        stats
    }

    /// Run on its own task
    pub fn spawn(self: Arc<Self>, shutdown: CancellationToken) -> JoinHandle<WorkerStats> {
        tokio::spawn(async move { self.run(shutdown).await })
    }
}

/// Cancel a spawned worker and wait at most `grace` for it to finish
///
/// Returns `None` when the worker had to be aborted or panicked.
pub async fn stop_worker(
    handle: JoinHandle<WorkerStats>,
    shutdown: &CancellationToken,
    grace: Duration,
) -> Option<WorkerStats> {
    shutdown.cancel();

    let abort = handle.abort_handle();
    match tokio::time::timeout(grace, handle).await {
        Ok(Ok(stats)) => Some(stats),
        Ok(Err(e)) => {
            error!(error = %e, "Notification worker task failed");
            None
        }
        Err(_) => {
            warn!(grace_seconds = grace.as_secs(), "Notification worker did not stop in time, aborting");
            abort.abort();
            None
        }
    }
}
