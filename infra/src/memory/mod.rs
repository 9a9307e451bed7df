//! In-process adapters
//!
//! Used by the HTTP integration tests and for running the service locally
//! without MySQL or Redis. They honour the same contracts as the durable
//! implementations: soft-delete aware lookups, unique identifiers and tokens,
//! all-or-nothing session writes and FIFO queues.

pub mod accounts;
pub mod queue;
pub mod templates;
pub mod tokens;

pub use accounts::InMemoryAccountRepository;
pub use queue::InMemoryTaskQueue;
pub use templates::{verification_email_template, InMemoryTemplateRepository};
pub use tokens::InMemoryTokenRepository;
