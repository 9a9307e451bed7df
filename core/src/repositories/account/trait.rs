//! Account repository trait defining the interface for account persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::account::Account;
use crate::errors::DomainError;

/// Repository trait for Account entity persistence operations
///
/// Every lookup excludes soft-deleted accounts. Implementations must enforce
/// uniqueness of email and phone and report a violation as
/// `DomainError::Conflict`.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find a live account by its ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError>;

    /// Find a live account by email (already normalized by the caller)
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError>;

    /// Find a live account by phone number
    async fn find_by_phone(&self, phone: &str) -> Result<Option<Account>, DomainError>;

    /// Insert a new account
    ///
    /// # Returns
    /// * `Ok(Account)` - The stored account
    /// * `Err(DomainError::Conflict)` - Email or phone already taken
    async fn create(&self, account: Account) -> Result<Account, DomainError>;

    /// Store a pending email code digest together with its expiry
    async fn set_email_verification(
        &self,
        id: Uuid,
        digest: &str,
        expiry: DateTime<Utc>,
    ) -> Result<(), DomainError>;

    /// Set `email_verified` and clear the pending digest and expiry
    async fn mark_email_verified(&self, id: Uuid) -> Result<(), DomainError>;

    /// Store a pending phone code digest
    async fn set_phone_verification(&self, id: Uuid, digest: &str) -> Result<(), DomainError>;

    /// Set `phone_verified` and clear the pending digest
    async fn mark_phone_verified(&self, id: Uuid) -> Result<(), DomainError>;

    /// Soft-delete an account
    ///
    /// # Returns
    /// * `Ok(true)` - Account was live and is now deleted
    /// * `Ok(false)` - No live account with this ID
    async fn soft_delete(&self, id: Uuid) -> Result<bool, DomainError>;
}
