//! Account registration with post-commit replication.

mod service;
mod traits;

#[cfg(test)]
mod tests;

pub use service::{RegistrationRequest, RegistrationService};
pub use traits::{AccountReplicator, NoopReplicator};
