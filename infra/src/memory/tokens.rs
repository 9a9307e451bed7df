//! In-memory token store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use us_core::domain::entities::token::{AccessToken, RefreshToken};
use us_core::errors::{AuthError, DomainError};
use us_core::repositories::TokenRepository;

#[derive(Default)]
struct Tables {
    access: Vec<AccessToken>,
    refresh: Vec<RefreshToken>,
}

/// Both token tables behind one lock, so every write is atomic
#[derive(Clone, Default)]
pub struct InMemoryTokenRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored access and refresh rows of an account, expired ones included
    pub async fn row_counts(&self, account_id: Uuid) -> (usize, usize) {
        let tables = self.tables.read().await;
        (
            tables.access.iter().filter(|t| t.account_id == account_id).count(),
            tables.refresh.iter().filter(|t| t.account_id == account_id).count(),
        )
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokenRepository {
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
        let mut tables = self.tables.write().await;

        let duplicate = tables.access.iter().any(|t| t.token == access.token)
            || refresh.map_or(false, |r| tables.refresh.iter().any(|t| t.token == r.token));
        if duplicate {
            return Err(DomainError::Conflict {
                message: "Token already exists".to_string(),
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
        let mut tables = self.tables.write().await;

        match refresh_token {
            Some(token) => {
                let before = tables.refresh.len();
                tables
                    .refresh
                    .retain(|t| !(t.account_id == account_id && t.token == token));
                if tables.refresh.len() == before {
                    return Err(AuthError::InvalidRefreshToken.into());
                }
            }
            None => tables.refresh.retain(|t| t.account_id != account_id),
        }
        tables.access.retain(|t| t.account_id != account_id);
        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let mut tables = self.tables.write().await;
        let before = tables.access.len() + tables.refresh.len();
        tables.access.retain(|t| t.is_valid_at(now));
        tables.refresh.retain(|t| t.is_valid_at(now));
        Ok((before - tables.access.len() - tables.refresh.len()) as u64)
    }
}
