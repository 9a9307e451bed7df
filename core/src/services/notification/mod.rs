//! Notification dispatch and delivery
//!
//! Request handlers publish `VerificationTask`s through the dispatcher; a
//! separate worker consumes them, renders the stored template and hands the
//! message to an email transport.

mod dispatcher;
mod template;
mod traits;
mod worker;

#[cfg(test)]
pub(crate) mod tests;

pub use dispatcher::NotificationDispatcher;
pub use template::render_email;
pub use traits::{EmailTransport, TaskQueue};
pub use worker::{
    stop_worker, MessageOutcome, NotificationWorker, NotificationWorkerConfig, WorkerStats,
};
