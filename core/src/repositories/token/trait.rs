//! Token store trait: persistence of issued access and refresh tokens.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::token::{AccessToken, RefreshToken};
use crate::errors::DomainError;

/// Repository trait for access and refresh token rows
///
/// A row is usable only while `now < expires_at`; expired rows are inert even
/// before they are purged. Callers pass `now` explicitly so every check in one
/// logical operation uses the same instant.
///
/// # Atomicity
/// `save_session` and `end_session` each run as a single transaction. A
/// unique-key violation on a token string surfaces as
/// `DomainError::Conflict` and leaves nothing behind.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Latest-expiring unexpired refresh token of an account
    async fn find_valid_refresh_token(
        &self,
        account_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<RefreshToken>, DomainError>;

    /// Latest-expiring unexpired access token of an account
    async fn find_valid_access_token(
        &self,
        account_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<AccessToken>, DomainError>;

    /// Whether `token` is stored for `account_id` and has not expired
    async fn is_access_token_active(
        &self,
        account_id: Uuid,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError>;

    /// Look up an unexpired refresh token by its exact string
    async fn find_refresh_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<RefreshToken>, DomainError>;

    /// Persist an access token and, when given, a new refresh token in one
    /// transaction
    ///
    /// # Returns
    /// * `Err(DomainError::Conflict)` - A token string already exists
    async fn save_session(
        &self,
        access: &AccessToken,
        refresh: Option<&RefreshToken>,
    ) -> Result<(), DomainError>;

    /// Revoke sessions of an account in one transaction
    ///
    /// Without `refresh_token` every access and refresh row of the account is
    /// deleted. With it, all access rows and the matching refresh row are
    /// deleted; if no refresh row matches, nothing is committed and
    /// `AuthError::InvalidRefreshToken` is returned.
    async fn end_session(
        &self,
        account_id: Uuid,
        refresh_token: Option<&str>,
    ) -> Result<(), DomainError>;

    /// Purge expired rows
    ///
    /// # Returns
    /// Number of access and refresh rows removed
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError>;
}
