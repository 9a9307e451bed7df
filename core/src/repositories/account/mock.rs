//! Mock implementation of AccountRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::account::Account;
use crate::errors::DomainError;

use super::trait_::AccountRepository;

/// Mock account repository for testing
pub struct MockAccountRepository {
    accounts: Arc<RwLock<HashMap<Uuid, Account>>>,
}

impl MockAccountRepository {
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Seed an account directly, bypassing uniqueness checks
    pub async fn insert(&self, account: Account) {
        self.accounts.write().await.insert(account.id, account);
    }

    /// Raw row access, including soft-deleted accounts
    pub async fn get(&self, id: Uuid) -> Option<Account> {
        self.accounts.read().await.get(&id).cloned()
    }

    async fn update<F>(&self, id: Uuid, apply: F) -> Result<(), DomainError>
    where
        F: FnOnce(&mut Account) + Send,
    {
        let mut accounts = self.accounts.write().await;
        match accounts.get_mut(&id).filter(|a| !a.is_deleted()) {
            Some(account) => {
                apply(account);
                Ok(())
            }
            None => Err(DomainError::NotFound {
                resource: format!("account {}", id),
            }),
        }
    }
}

impl Default for MockAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountRepository for MockAccountRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(&id).filter(|a| !a.is_deleted()).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|a| a.email == email && !a.is_deleted())
            .cloned())
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|a| a.phone.as_deref() == Some(phone) && !a.is_deleted())
            .cloned())
    }

    async fn create(&self, account: Account) -> Result<Account, DomainError> {
        let mut accounts = self.accounts.write().await;

        // Unique indexes cover soft-deleted rows too
        if accounts.values().any(|a| a.email == account.email) {
            return Err(DomainError::Conflict {
                message: "Email already exists".to_string(),
            });
        }
        if account.phone.is_some() && accounts.values().any(|a| a.phone == account.phone) {
            return Err(DomainError::Conflict {
                message: "Phone number already exists".to_string(),
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
        self.update(id, move |a| a.begin_email_verification(digest, expiry)).await
    }

    async fn mark_email_verified(&self, id: Uuid) -> Result<(), DomainError> {
        self.update(id, |a| a.complete_email_verification()).await
    }

    async fn set_phone_verification(&self, id: Uuid, digest: &str) -> Result<(), DomainError> {
        let digest = digest.to_string();
        self.update(id, move |a| a.begin_phone_verification(digest)).await
    }

    async fn mark_phone_verified(&self, id: Uuid) -> Result<(), DomainError> {
        self.update(id, |a| a.complete_phone_verification()).await
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
