//! Session issuance and validation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};
use uuid::Uuid;

use us_shared::validation::normalize_email;

use crate::domain::entities::account::Account;
use crate::domain::entities::token::RefreshToken;
use crate::domain::value_objects::SessionResponse;
use crate::errors::{AuthError, DomainError, DomainResult, TokenError};
use crate::repositories::{AccountRepository, TokenRepository};
use crate::services::credentials::PasswordHasher;
use crate::services::token::TokenService;

const BEARER_PREFIX: &str = "Bearer ";

/// Hashed once and checked against when the email is unknown
const DUMMY_PASSWORD: &str = "unknown-account-placeholder";

/// Resolves an `Authorization` header value to an account id
///
/// Implemented by [`SessionService`] and consumed by the HTTP middleware,
/// which only needs this one capability.
#[async_trait]
pub trait BearerValidator: Send + Sync {
    async fn validate_bearer(&self, authorization: Option<&str>) -> DomainResult<Uuid>;
}

/// Issues, validates and ends sessions
///
/// A session is an access token row plus a refresh token row in the token
/// store. Access tokens are only honoured while their signature verifies AND
/// their row is still stored, so deleting the row revokes the token.
pub struct SessionService<A, T>
where
    A: AccountRepository,
    T: TokenRepository,
{
    accounts: Arc<A>,
    tokens: Arc<T>,
    token_service: Arc<TokenService>,
    hasher: Arc<dyn PasswordHasher>,
    dummy_digest: OnceCell<String>,
}

impl<A, T> SessionService<A, T>
where
    A: AccountRepository,
    T: TokenRepository,
{
    pub fn new(
        accounts: Arc<A>,
        tokens: Arc<T>,
        token_service: Arc<TokenService>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            accounts,
            tokens,
            token_service,
            hasher,
            dummy_digest: OnceCell::new(),
        }
    }

    /// Log in with email and password
    ///
    /// Repeated logins while a session is alive return the stored pair
    /// unchanged. A live refresh token without a live access token gets a new
    /// access token. Otherwise a fresh pair is minted.
    ///
    /// # Returns
    ///
    /// * `Ok(SessionResponse)` - Access and refresh tokens
    /// * `Err(AuthError::AuthenticationFailed)` - Unknown email or wrong
    ///   password; the two cases are indistinguishable
    pub async fn issue_session(&self, email: &str, password: &str) -> DomainResult<SessionResponse> {
        let email = normalize_email(email);

        let account = match self.accounts.find_by_email(&email).await? {
            Some(account) => account,
            None => {
                self.verify_against_dummy(password).await;
                info!(event = "login_failed", "Login rejected");
                return Err(AuthError::AuthenticationFailed.into());
            }
        };

        if !self.hasher.verify_secret(password, &account.password_hash).await {
            info!(account_id = %account.id, event = "login_failed", "Login rejected");
            return Err(AuthError::AuthenticationFailed.into());
        }

        let now = Utc::now();
        let response = match self.tokens.find_valid_refresh_token(account.id, now).await? {
            Some(refresh) => self.attach_access_token(&account, refresh, now).await?,
            None => self.mint_session(&account, now).await?,
        };

        info!(account_id = %account.id, event = "session_issued", "Session issued");
        Ok(response)
    }

    /// Resolve a raw `Authorization` header to the owning account id
    ///
    /// Accepts `Bearer <token>` or a bare token. A missing header yields
    /// `Unauthorized`; any signature, expiry, claim or store mismatch yields
    /// `InvalidToken`.
    pub async fn validate_bearer(&self, authorization: Option<&str>) -> DomainResult<Uuid> {
        let token = authorization
            .map(str::trim)
            .map(|value| value.strip_prefix(BEARER_PREFIX).map(str::trim).unwrap_or(value))
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::Unauthorized)?;

        let claims = self.token_service.verify_access_token(token).map_err(|e| {
            debug!(reason = %e, "Bearer token failed verification");
            TokenError::InvalidToken
        })?;

        let account_id = claims.account_id().map_err(|_| TokenError::InvalidToken)?;

        let now = Utc::now();
        if !self.tokens.is_access_token_active(account_id, token, now).await? {
            debug!(account_id = %account_id, "Bearer token not in store");
            return Err(TokenError::InvalidToken.into());
        }

        // Sessions of soft-deleted accounts are dead even if rows remain
        if self.accounts.find_by_id(account_id).await?.is_none() {
            debug!(account_id = %account_id, "Bearer token owner missing");
            return Err(TokenError::InvalidToken.into());
        }

        Ok(account_id)
    }

    /// Log out
    ///
    /// Without a refresh token every session of the account ends. With one,
    /// all access tokens and that refresh token are deleted atomically, or
    /// nothing is if it does not belong to the account.
    pub async fn end_session(&self, account_id: Uuid, refresh_token: Option<&str>) -> DomainResult<()> {
        self.tokens.end_session(account_id, refresh_token).await?;

        info!(
            account_id = %account_id,
            scoped = refresh_token.is_some(),
            event = "session_ended",
            "Session ended"
        );
        Ok(())
    }

    /// Trade a refresh token for an access token
    ///
    /// The refresh token is returned unchanged; an access token that is still
    /// live is reused.
    ///
    /// # Returns
    ///
    /// * `Err(AuthError::InvalidRefreshToken)` - Unknown or expired token, or
    ///   its account no longer exists
    pub async fn refresh_session(&self, refresh_token: &str) -> DomainResult<SessionResponse> {
        let now = Utc::now();

        let refresh = self
            .tokens
            .find_refresh_token(refresh_token, now)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        let account = self
            .accounts
            .find_by_id(refresh.account_id)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        let response = self.attach_access_token(&account, refresh, now).await?;
        info!(account_id = %account.id, event = "session_refreshed", "Session refreshed");
        Ok(response)
    }

    /// Pair a live refresh token with a live or newly minted access token
    async fn attach_access_token(
        &self,
        account: &Account,
        refresh: RefreshToken,
        now: DateTime<Utc>,
    ) -> DomainResult<SessionResponse> {
        if let Some(access) = self.tokens.find_valid_access_token(account.id, now).await? {
            return Ok(SessionResponse::from_tokens(&access, &refresh, now));
        }

        let access = self.token_service.mint_access_token(account.id, &account.email, now)?;

        match self.tokens.save_session(&access, None).await {
            Ok(()) => Ok(SessionResponse::from_tokens(&access, &refresh, now)),
            Err(DomainError::Conflict { message }) => {
                self.recover_concurrent_session(account.id, Some(refresh), now, message)
                    .await
            }
            Err(e) => Err(e),
        }
    }

    /// Spend the same hashing work as a password mismatch
    async fn verify_against_dummy(&self, password: &str) {
        let digest = self
            .dummy_digest
            .get_or_try_init(|| self.hasher.hash_secret(DUMMY_PASSWORD))
            .await;

        match digest {
            Ok(digest) => {
                self.hasher.verify_secret(password, digest).await;
            }
            Err(e) => warn!(error = %e, "Could not prepare placeholder digest"),
        }
    }

    async fn mint_session(&self, account: &Account, now: DateTime<Utc>) -> DomainResult<SessionResponse> {
        let access = self.token_service.mint_access_token(account.id, &account.email, now)?;
        let refresh = self.token_service.generate_refresh_token(account.id, now);

        match self.tokens.save_session(&access, Some(&refresh)).await {
            Ok(()) => Ok(SessionResponse::from_tokens(&access, &refresh, now)),
            Err(DomainError::Conflict { message }) => {
                self.recover_concurrent_session(account.id, None, now, message)
                    .await
            }
            Err(e) => Err(e),
        }
    }

    /// The insert hit a unique key: another login for the account committed
    /// first, so answer with the live session now in the store.
    async fn recover_concurrent_session(
        &self,
        account_id: Uuid,
        refresh: Option<RefreshToken>,
        now: DateTime<Utc>,
        conflict: String,
    ) -> DomainResult<SessionResponse> {
        warn!(account_id = %account_id, event = "session_race", "Concurrent login detected, re-reading session");

        let refresh = match refresh {
            Some(refresh) => Some(refresh),
            None => self.tokens.find_valid_refresh_token(account_id, now).await?,
        };
        let access = self.tokens.find_valid_access_token(account_id, now).await?;

        match (access, refresh) {
            (Some(access), Some(refresh)) => Ok(SessionResponse::from_tokens(&access, &refresh, now)),
            _ => Err(DomainError::Conflict { message: conflict }),
        }
    }
}

#[async_trait]
impl<A, T> BearerValidator for SessionService<A, T>
where
    A: AccountRepository,
    T: TokenRepository,
{
    async fn validate_bearer(&self, authorization: Option<&str>) -> DomainResult<Uuid> {
        SessionService::validate_bearer(self, authorization).await
    }
}
