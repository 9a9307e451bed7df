use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use us_core::domain::entities::account::Account;

/// Public view of an account; digests and the password hash never leave the service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: Uuid,
    pub email: String,
    pub phone: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email_verified: bool,
    pub phone_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            email: account.email.clone(),
            phone: account.phone.clone(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            email_verified: account.email_verified,
            phone_verified: account.phone_verified,
            created_at: account.created_at,
        }
    }
}
