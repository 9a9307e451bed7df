//! MySQL implementation of the AccountRepository trait.
//!
//! Identifiers are stored as `CHAR(36)` strings. Every read filters on
//! `deleted_at IS NULL`; the unique indexes on `email` and `phone` cover
//! soft-deleted rows too, so a deleted account keeps its identifiers reserved.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;
use uuid::Uuid;

use us_core::domain::entities::account::Account;
use us_core::errors::DomainError;
use us_core::repositories::AccountRepository;

use super::{column, db_error, is_unique_violation, uuid_column};

const ACCOUNT_COLUMNS: &str = r#"
    id, email, phone, password_hash, first_name, last_name,
    email_verified, phone_verified,
    email_verification_code_digest, email_verification_expiry,
    phone_verification_code_digest,
    created_at, updated_at, deleted_at
"#;

/// MySQL implementation of AccountRepository
pub struct MySqlAccountRepository {
    pool: MySqlPool,
}

impl MySqlAccountRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to Account entity
    fn row_to_account(row: &sqlx::mysql::MySqlRow) -> Result<Account, DomainError> {
        Ok(Account {
            id: uuid_column(row, "id")?,
            email: column(row, "email")?,
            phone: column(row, "phone")?,
            password_hash: column(row, "password_hash")?,
            first_name: column(row, "first_name")?,
            last_name: column(row, "last_name")?,
            email_verified: column(row, "email_verified")?,
            phone_verified: column(row, "phone_verified")?,
            email_verification_code_digest: column(row, "email_verification_code_digest")?,
            email_verification_expiry: column(row, "email_verification_expiry")?,
            phone_verification_code_digest: column(row, "phone_verification_code_digest")?,
            created_at: column(row, "created_at")?,
            updated_at: column(row, "updated_at")?,
            deleted_at: column(row, "deleted_at")?,
        })
    }

    async fn find_one(&self, filter: &str, value: String) -> Result<Option<Account>, DomainError> {
        let query = format!(
            "SELECT {} FROM accounts WHERE {} = ? AND deleted_at IS NULL LIMIT 1",
            ACCOUNT_COLUMNS, filter
        );

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to query account", e))?;

        row.as_ref().map(Self::row_to_account).transpose()
    }

    /// Run an update against a live account, reporting a missing row as NotFound
    async fn update_live(
        &self,
        id: Uuid,
        query: sqlx::query::Query<'_, sqlx::MySql, sqlx::mysql::MySqlArguments>,
    ) -> Result<(), DomainError> {
        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to update account", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound {
                resource: format!("account {}", id),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl AccountRepository for MySqlAccountRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError> {
        self.find_one("id", id.to_string()).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        self.find_one("email", email.to_string()).await
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Account>, DomainError> {
        self.find_one("phone", phone.to_string()).await
    }

    async fn create(&self, account: Account) -> Result<Account, DomainError> {
        let query = r#"
            INSERT INTO accounts (
                id, email, phone, password_hash, first_name, last_name,
                email_verified, phone_verified, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(account.id.to_string())
            .bind(&account.email)
            .bind(&account.phone)
            .bind(&account.password_hash)
            .bind(&account.first_name)
            .bind(&account.last_name)
            .bind(account.email_verified)
            .bind(account.phone_verified)
            .bind(account.created_at)
            .bind(account.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::Conflict {
                        message: "Email or phone number already registered".to_string(),
                    }
                } else {
                    db_error("Failed to create account", e)
                }
            })?;

        Ok(account)
    }

    async fn set_email_verification(
        &self,
        id: Uuid,
        digest: &str,
        expiry: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let query = sqlx::query(
            r#"
            UPDATE accounts
            SET email_verification_code_digest = ?, email_verification_expiry = ?, updated_at = ?
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(digest)
        .bind(expiry)
        .bind(Utc::now())
        .bind(id.to_string());

        self.update_live(id, query).await
    }

    async fn mark_email_verified(&self, id: Uuid) -> Result<(), DomainError> {
        let query = sqlx::query(
            r#"
            UPDATE accounts
            SET email_verified = TRUE,
                email_verification_code_digest = NULL,
                email_verification_expiry = NULL,
                updated_at = ?
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(Utc::now())
        .bind(id.to_string());

        self.update_live(id, query).await
    }

    async fn set_phone_verification(&self, id: Uuid, digest: &str) -> Result<(), DomainError> {
        let query = sqlx::query(
            r#"
            UPDATE accounts
            SET phone_verification_code_digest = ?, updated_at = ?
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(digest)
        .bind(Utc::now())
        .bind(id.to_string());

        self.update_live(id, query).await
    }

    async fn mark_phone_verified(&self, id: Uuid) -> Result<(), DomainError> {
        let query = sqlx::query(
            r#"
            UPDATE accounts
            SET phone_verified = TRUE, phone_verification_code_digest = NULL, updated_at = ?
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(Utc::now())
        .bind(id.to_string());

        self.update_live(id, query).await
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE accounts SET deleted_at = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(now)
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to delete account", e))?;

        Ok(result.rows_affected() > 0)
    }
}
