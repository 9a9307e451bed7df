//! Account entity representing a registered owner identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account.
///
/// Verification fields only ever hold digests of one-time codes; the
/// plaintext code is delivered to the owner and never stored. Accounts are
/// soft-deleted by setting `deleted_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier for the account
    pub id: Uuid,

    /// Unique login email (stored lowercase)
    pub email: String,

    /// Unique phone number in E.164 format
    pub phone: Option<String>,

    /// One-way password digest (salt embedded)
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub first_name: Option<String>,
    pub last_name: Option<String>,

    pub email_verified: bool,
    pub phone_verified: bool,

    #[serde(skip_serializing)]
    pub email_verification_code_digest: Option<String>,
    pub email_verification_expiry: Option<DateTime<Utc>>,

    #[serde(skip_serializing)]
    pub phone_verification_code_digest: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Soft-delete marker
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Creates a new, unverified account
    pub fn new(email: String, password_hash: String, phone: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            phone,
            password_hash,
            first_name: None,
            last_name: None,
            email_verified: false,
            phone_verified: false,
            email_verification_code_digest: None,
            email_verification_expiry: None,
            phone_verification_code_digest: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Sets the optional display names
    pub fn with_names(mut self, first_name: Option<String>, last_name: Option<String>) -> Self {
        self.first_name = first_name;
        self.last_name = last_name;
        self
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Name used to greet the owner in notifications
    pub fn greeting_name(&self) -> String {
        match self.first_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self
                .email
                .split('@')
                .next()
                .unwrap_or_default()
                .to_string(),
        }
    }

    /// Stores a pending email code digest and its absolute expiry
    pub fn begin_email_verification(&mut self, digest: String, expiry: DateTime<Utc>) {
        self.email_verification_code_digest = Some(digest);
        self.email_verification_expiry = Some(expiry);
        self.updated_at = Utc::now();
    }

    /// Marks the email verified and clears the pending code
    pub fn complete_email_verification(&mut self) {
        self.email_verified = true;
        self.email_verification_code_digest = None;
        self.email_verification_expiry = None;
        self.updated_at = Utc::now();
    }

    pub fn begin_phone_verification(&mut self, digest: String) {
        self.phone_verification_code_digest = Some(digest);
        self.updated_at = Utc::now();
    }

    pub fn complete_phone_verification(&mut self) {
        self.phone_verified = true;
        self.phone_verification_code_digest = None;
        self.updated_at = Utc::now();
    }

    pub fn soft_delete(&mut self) {
        let now = Utc::now();
        self.deleted_at = Some(now);
        self.updated_at = now;
    }
}
