//! Database module - MySQL implementations using SQLx
//!
//! - Connection pool management and embedded migrations
//! - Account, token and email template repositories

pub mod connection;
pub mod mysql;


// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::{MySqlAccountRepository, MySqlTemplateRepository, MySqlTokenRepository};
