//! MySQL implementation of the TokenRepository trait.
//!
//! Access and refresh tokens live in two tables with the same shape, each
//! unique on `token` and indexed on `(account_id, expires_at)`. Session writes
//! and revocations run inside one transaction; dropping an uncommitted
//! transaction rolls it back.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySql, MySqlPool, Transaction};
use uuid::Uuid;

use us_core::domain::entities::token::{AccessToken, RefreshToken};
use us_core::errors::{AuthError, DomainError};
use us_core::repositories::TokenRepository;

use super::{column, db_error, is_unique_violation, uuid_column};

/// MySQL implementation of TokenRepository
pub struct MySqlTokenRepository {
    pool: MySqlPool,
}

impl MySqlTokenRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_access_token(row: &sqlx::mysql::MySqlRow) -> Result<AccessToken, DomainError> {
        Ok(AccessToken {
            id: uuid_column(row, "id")?,
            account_id: uuid_column(row, "account_id")?,
            token: column(row, "token")?,
            expires_at: column(row, "expires_at")?,
            created_at: column(row, "created_at")?,
        })
    }

    fn row_to_refresh_token(row: &sqlx::mysql::MySqlRow) -> Result<RefreshToken, DomainError> {
        Ok(RefreshToken {
            id: uuid_column(row, "id")?,
            account_id: uuid_column(row, "account_id")?,
            token: column(row, "token")?,
            expires_at: column(row, "expires_at")?,
            created_at: column(row, "created_at")?,
        })
    }

    async fn begin(&self) -> Result<Transaction<'_, MySql>, DomainError> {
        self.pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))
    }

    fn insert_error(err: sqlx::Error) -> DomainError {
        if is_unique_violation(&err) {
            DomainError::Conflict {
                message: "Token already exists".to_string(),
            }
        } else {
            db_error("Failed to save session token", err)
        }
    }
}

#[async_trait]
impl TokenRepository for MySqlTokenRepository {
    async fn find_valid_refresh_token(
        &self,
        account_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<RefreshToken>, DomainError> {
        let query = r#"
            SELECT id, account_id, token, expires_at, created_at
            FROM refresh_tokens
            WHERE account_id = ? AND expires_at > ?
            ORDER BY expires_at DESC
            LIMIT 1
        "#;

        let row = sqlx::query(query)
            .bind(account_id.to_string())
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find refresh token", e))?;

        row.as_ref().map(Self::row_to_refresh_token).transpose()
    }

    async fn find_valid_access_token(
        &self,
        account_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<AccessToken>, DomainError> {
        let query = r#"
            SELECT id, account_id, token, expires_at, created_at
            FROM access_tokens
            WHERE account_id = ? AND expires_at > ?
            ORDER BY expires_at DESC
            LIMIT 1
        "#;

        let row = sqlx::query(query)
            .bind(account_id.to_string())
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find access token", e))?;

        row.as_ref().map(Self::row_to_access_token).transpose()
    }

    async fn is_access_token_active(
        &self,
        account_id: Uuid,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let query = r#"
            SELECT EXISTS(
                SELECT 1 FROM access_tokens
                WHERE account_id = ? AND token = ? AND expires_at > ?
            ) AS active
        "#;

        let row = sqlx::query(query)
            .bind(account_id.to_string())
            .bind(token)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to check access token", e))?;

        let active: i64 = column(&row, "active")?;
        Ok(active == 1)
    }

    async fn find_refresh_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<RefreshToken>, DomainError> {
        let query = r#"
            SELECT id, account_id, token, expires_at, created_at
            FROM refresh_tokens
            WHERE token = ? AND expires_at > ?
            LIMIT 1
        "#;

        let row = sqlx::query(query)
            .bind(token)
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find refresh token", e))?;

        row.as_ref().map(Self::row_to_refresh_token).transpose()
    }

    async fn save_session(
        &self,
        access: &AccessToken,
        refresh: Option<&RefreshToken>,
    ) -> Result<(), DomainError> {
        let mut tx = self.begin().await?;

        sqlx::query(
            "INSERT INTO access_tokens (id, account_id, token, expires_at, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(access.id.to_string())
        .bind(access.account_id.to_string())
        .bind(&access.token)
        .bind(access.expires_at)
        .bind(access.created_at)
        .execute(&mut *tx)
        .await
        .map_err(Self::insert_error)?;

        if let Some(refresh) = refresh {
            sqlx::query(
                "INSERT INTO refresh_tokens (id, account_id, token, expires_at, created_at) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(refresh.id.to_string())
            .bind(refresh.account_id.to_string())
            .bind(&refresh.token)
            .bind(refresh.expires_at)
            .bind(refresh.created_at)
            .execute(&mut *tx)
            .await
            .map_err(Self::insert_error)?;
        }

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit session", e))
    }

    async fn end_session(
        &self,
        account_id: Uuid,
        refresh_token: Option<&str>,
    ) -> Result<(), DomainError> {
        let account = account_id.to_string();
        let mut tx = self.begin().await?;

        let refresh_deleted = match refresh_token {
            Some(token) => sqlx::query("DELETE FROM refresh_tokens WHERE account_id = ? AND token = ?")
                .bind(&account)
                .bind(token),
            None => sqlx::query("DELETE FROM refresh_tokens WHERE account_id = ?").bind(&account),
        }
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to revoke refresh tokens", e))?
        .rows_affected();

        if refresh_token.is_some() && refresh_deleted == 0 {
            tx.rollback()
                .await
                .map_err(|e| db_error("Failed to roll back logout", e))?;
            return Err(AuthError::InvalidRefreshToken.into());
        }

        let access_deleted = sqlx::query("DELETE FROM access_tokens WHERE account_id = ?")
            .bind(&account)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to revoke access tokens", e))?
            .rows_affected();

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit logout", e))?;

        tracing::debug!(
            account_id = %account_id,
            access_deleted,
            refresh_deleted,
            "Session tokens revoked"
        );
        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let access = sqlx::query("DELETE FROM access_tokens WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to purge access tokens", e))?
            .rows_affected();

        let refresh = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to purge refresh tokens", e))?
            .rows_affected();

        Ok(access + refresh)
    }
}
