//! Mock implementation of TokenRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::token::{AccessToken, RefreshToken};
use crate::errors::{AuthError, DomainError};

use super::trait_::TokenRepository;

#[derive(Default)]
struct TokenTables {
    access: Vec<AccessToken>,
    refresh: Vec<RefreshToken>,
}

/// Mock token store for testing
///
/// `arm_concurrent_login` simulates another request committing a session
/// between this request's lookup and its insert.
pub struct MockTokenRepository {
    tables: Arc<RwLock<TokenTables>>,
    racer: Mutex<Option<(AccessToken, RefreshToken)>>,
    fail_writes: Mutex<bool>,
}

impl MockTokenRepository {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(TokenTables::default())),
            racer: Mutex::new(None),
            fail_writes: Mutex::new(false),
        }
    }

    /// The next `save_session` first commits this pair, then conflicts
    pub fn arm_concurrent_login(&self, access: AccessToken, refresh: RefreshToken) {
        *self.racer.lock().unwrap() = Some((access, refresh));
    }

    /// Make every write fail as if the database were unreachable
    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    pub async fn insert_access(&self, token: AccessToken) {
        self.tables.write().await.access.push(token);
    }

    pub async fn insert_refresh(&self, token: RefreshToken) {
        self.tables.write().await.refresh.push(token);
    }

    pub async fn access_count(&self, account_id: Uuid) -> usize {
        let tables = self.tables.read().await;
        tables.access.iter().filter(|t| t.account_id == account_id).count()
    }

    pub async fn refresh_count(&self, account_id: Uuid) -> usize {
        let tables = self.tables.read().await;
        tables.refresh.iter().filter(|t| t.account_id == account_id).count()
    }

    fn check_writes(&self) -> Result<(), DomainError> {
        if *self.fail_writes.lock().unwrap() {
            return Err(DomainError::database("mock store unavailable"));
        }
        Ok(())
    }
}

impl Default for MockTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenRepository for MockTokenRepository {
    async fn find_valid_refresh_token(
        &self,
        account_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<RefreshToken>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .refresh
            .iter()
            .filter(|t| t.account_id == account_id && t.is_valid_at(now))
            .max_by_key(|t| t.expires_at)
            .cloned())
    }

    async fn find_valid_access_token(
        &self,
        account_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<AccessToken>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .access
            .iter()
            .filter(|t| t.account_id == account_id && t.is_valid_at(now))
            .max_by_key(|t| t.expires_at)
            .cloned())
    }

    async fn is_access_token_active(
        &self,
        account_id: Uuid,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .access
            .iter()
            .any(|t| t.account_id == account_id && t.token == token && t.is_valid_at(now)))
    }

    async fn find_refresh_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<RefreshToken>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .refresh
            .iter()
            .find(|t| t.token == token && t.is_valid_at(now))
            .cloned())
    }

    async fn save_session(
        &self,
        access: &AccessToken,
        refresh: Option<&RefreshToken>,
    ) -> Result<(), DomainError> {
        self.check_writes()?;
        let mut tables = self.tables.write().await;

        let racer = self.racer.lock().unwrap().take();
        if let Some((racer_access, racer_refresh)) = racer {
            tables.access.push(racer_access);
            tables.refresh.push(racer_refresh);
            return Err(DomainError::Conflict {
                message: "Duplicate entry for key 'access_tokens.token'".to_string(),
            });
        }

        let duplicate_access = tables.access.iter().any(|t| t.token == access.token);
        let duplicate_refresh = refresh
            .map(|r| tables.refresh.iter().any(|t| t.token == r.token))
            .unwrap_or(false);
        if duplicate_access || duplicate_refresh {
            return Err(DomainError::Conflict {
                message: "Duplicate token".to_string(),
            });
        }

        tables.access.push(access.clone());
        if let Some(refresh) = refresh {
            tables.refresh.push(refresh.clone());
        }
        Ok(())
    }

    async fn end_session(
        &self,
        account_id: Uuid,
        refresh_token: Option<&str>,
    ) -> Result<(), DomainError> {
        self.check_writes()?;
        let mut tables = self.tables.write().await;

        if let Some(token) = refresh_token {
            let matches = tables
                .refresh
                .iter()
                .any(|t| t.account_id == account_id && t.token == token);
            if !matches {
                return Err(AuthError::InvalidRefreshToken.into());
            }
            tables.refresh.retain(|t| !(t.account_id == account_id && t.token == token));
        } else {
            tables.refresh.retain(|t| t.account_id != account_id);
        }
        tables.access.retain(|t| t.account_id != account_id);
        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        self.check_writes()?;
        let mut tables = self.tables.write().await;
        let before = tables.access.len() + tables.refresh.len();
        tables.access.retain(|t| t.is_valid_at(now));
        tables.refresh.retain(|t| t.is_valid_at(now));
        Ok((before - tables.access.len() - tables.refresh.len()) as u64)
    }
}
