//! Account registration

use std::sync::Arc;
use tracing::{info, warn};

use us_shared::phone::{is_valid_international_phone, normalize_phone_number};
use us_shared::validation::{is_valid_email, is_valid_password, normalize_email, MIN_PASSWORD_LENGTH};

use crate::domain::entities::account::Account;
use crate::errors::{DomainError, DomainResult};
use crate::repositories::AccountRepository;
use crate::services::credentials::PasswordHasher;

use super::traits::AccountReplicator;

/// Input for [`RegistrationService::register`]
#[derive(Debug, Clone, Default)]
pub struct RegistrationRequest {
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

pub struct RegistrationService<A: AccountRepository> {
    accounts: Arc<A>,
    hasher: Arc<dyn PasswordHasher>,
    replicator: Arc<dyn AccountReplicator>,
}

impl<A: AccountRepository> RegistrationService<A> {
    pub fn new(
        accounts: Arc<A>,
        hasher: Arc<dyn PasswordHasher>,
        replicator: Arc<dyn AccountReplicator>,
    ) -> Self {
        Self {
            accounts,
            hasher,
            replicator,
        }
    }

    /// Create an account
    ///
    /// # Returns
    ///
    /// * `Ok(Account)` - The stored account
    /// * `Err(DomainError::Validation)` - Malformed email, phone or short password
    /// * `Err(DomainError::Conflict)` - Email or phone already registered
    pub async fn register(&self, request: RegistrationRequest) -> DomainResult<Account> {
        let email = normalize_email(&request.email);
        if !is_valid_email(&email) {
            return Err(DomainError::Validation {
                message: "Invalid email format".to_string(),
            });
        }
        if !is_valid_password(&request.password) {
            return Err(DomainError::Validation {
                message: format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
            });
        }

        let phone = match request.phone.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => {
                if !is_valid_international_phone(raw) {
                    return Err(DomainError::Validation {
                        message: "Invalid phone number format".to_string(),
                    });
                }
                Some(normalize_phone_number(raw))
            }
            _ => None,
        };

        if self.accounts.find_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict {
                message: "Email already exists".to_string(),
            });
        }
        if let Some(phone) = phone.as_deref() {
            if self.accounts.find_by_phone(phone).await?.is_some() {
                return Err(DomainError::Conflict {
                    message: "Phone number already exists".to_string(),
                });
            }
        }

        let password_hash = self.hasher.hash_secret(&request.password).await?;
        let account = Account::new(email, password_hash, phone)
            .with_names(non_blank(request.first_name), non_blank(request.last_name));

        // The store's unique indexes settle races between the checks above
        let account = self.accounts.create(account).await?;

        info!(account_id = %account.id, event = "account_registered", "Account registered");

        if let Err(e) = self.replicator.replicate(&account).await {
            warn!(account_id = %account.id, error = %e, "Account replication failed");
        }

        Ok(account)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
