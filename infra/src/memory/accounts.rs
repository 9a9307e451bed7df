//! In-memory account store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use us_core::domain::entities::account::Account;
use us_core::errors::DomainError;
use us_core::repositories::AccountRepository;

#[derive(Clone, Default)]
pub struct InMemoryAccountRepository {
    accounts: Arc<RwLock<HashMap<Uuid, Account>>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row as stored, including soft-deleted accounts
    pub async fn raw(&self, id: Uuid) -> Option<Account> {
        self.accounts.read().await.get(&id).cloned()
    }

    async fn update_live<F>(&self, id: Uuid, apply: F) -> Result<(), DomainError>
    where
        F: FnOnce(&mut Account) + Send,
    {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(&id)
            .filter(|a| !a.is_deleted())
            .ok_or_else(|| DomainError::NotFound {
                resource: format!("account {}", id),
            })?;
        apply(account);
        Ok(())
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(&id).filter(|a| !a.is_deleted()).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|a| !a.is_deleted() && a.email == email)
            .cloned())
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|a| !a.is_deleted() && a.phone.as_deref() == Some(phone))
            .cloned())
    }

    async fn create(&self, account: Account) -> Result<Account, DomainError> {
        let mut accounts = self.accounts.write().await;
        // Unique indexes cover soft-deleted rows as well
        let taken = accounts.values().any(|existing| {
            existing.email == account.email
                || (account.phone.is_some() && existing.phone == account.phone)
        });
        if taken {
            return Err(DomainError::Conflict {
                message: "Email or phone number already registered".to_string(),
            });
        }
        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn set_email_verification(
        &self,
        id: Uuid,
        digest: &str,
        expiry: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let digest = digest.to_string();
        self.update_live(id, move |a| a.begin_email_verification(digest, expiry))
            .await
    }

    async fn mark_email_verified(&self, id: Uuid) -> Result<(), DomainError> {
        self.update_live(id, Account::complete_email_verification).await
    }

    async fn set_phone_verification(&self, id: Uuid, digest: &str) -> Result<(), DomainError> {
        let digest = digest.to_string();
        self.update_live(id, move |a| a.begin_phone_verification(digest))
            .await
    }

    async fn mark_phone_verified(&self, id: Uuid) -> Result<(), DomainError> {
        self.update_live(id, Account::complete_phone_verification).await
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut accounts = self.accounts.write().await;
        match accounts.get_mut(&id).filter(|a| !a.is_deleted()) {
            Some(account) => {
                account.soft_delete();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
