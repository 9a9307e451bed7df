//! Email and phone verification codes

use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use us_shared::phone::mask_phone_number;

use crate::domain::entities::account::Account;
use crate::domain::entities::notification::VerificationTask;
use crate::domain::entities::verification::{digests_match, VerificationCode};
use crate::errors::{DomainError, DomainResult, VerificationError};
use crate::repositories::AccountRepository;
use crate::services::notification::NotificationDispatcher;

use super::config::VerificationServiceConfig;
use super::traits::SmsSender;

/// Issues and checks one-time codes proving control of an email address or
/// phone number
///
/// Only `SHA-256(code || target)` is stored. Email codes carry an absolute
/// expiry; phone codes do not.
pub struct VerificationService<A: AccountRepository> {
    accounts: Arc<A>,
    dispatcher: Arc<NotificationDispatcher>,
    sms: Arc<dyn SmsSender>,
    config: VerificationServiceConfig,
}

impl<A: AccountRepository> VerificationService<A> {
    pub fn new(
        accounts: Arc<A>,
        dispatcher: Arc<NotificationDispatcher>,
        sms: Arc<dyn SmsSender>,
        config: VerificationServiceConfig,
    ) -> Self {
        Self {
            accounts,
            dispatcher,
            sms,
            config,
        }
    }

    /// Send a fresh email verification code
    ///
    /// The digest and expiry are stored before the task is queued; a new
    /// request replaces any pending code.
    ///
    /// # Returns
    ///
    /// * `Err(VerificationError::EmailNotProvided)` - Account has no email
    /// * `Err(VerificationError::EmailAlreadyVerified)` - Nothing is sent
    /// * `Err(NotificationError::EmailTaskPublishingFailed)` - Queue rejected the task
    pub async fn request_email_verification(&self, account_id: Uuid) -> DomainResult<()> {
        let account = self.load_account(account_id).await?;

        if account.email.trim().is_empty() {
            return Err(VerificationError::EmailNotProvided.into());
        }
        if account.email_verified {
            return Err(VerificationError::EmailAlreadyVerified.into());
        }

        let code = VerificationCode::generate();
        let digest = code.digest_for(&account.email);
        let ttl = self.config.email_code_ttl();
        let expiry = Utc::now() + ttl;

        self.accounts
            .set_email_verification(account.id, &digest, expiry)
            .await?;

        let task = VerificationTask::new(&self.config.email_template_code, &account.email)
            .with_param("FirstName", account.greeting_name())
            .with_param("VerificationCode", code.as_str())
            .with_param("ExpiryTime", humanize_duration(ttl));

        self.dispatcher.dispatch(&task).await?;

        info!(
            account_id = %account.id,
            expires_at = %expiry,
            event = "email_verification_requested",
            "Email verification code queued"
        );
        Ok(())
    }

    /// Check an email verification code
    ///
    /// A wrong code, a missing pending code and an elapsed expiry all yield
    /// `InvalidVerificationCode`.
    pub async fn confirm_email_verification(&self, account_id: Uuid, code: &str) -> DomainResult<()> {
        let account = self.load_account(account_id).await?;

        if account.email_verified {
            return Err(VerificationError::EmailAlreadyVerified.into());
        }

        let expired = account
            .email_verification_expiry
            .map_or(true, |expiry| Utc::now() >= expiry);
        if expired || !Self::code_matches(account.email_verification_code_digest.as_deref(), code, &account.email) {
            info!(account_id = %account.id, event = "email_verification_failed", "Email verification rejected");
            return Err(VerificationError::InvalidVerificationCode.into());
        }

        self.accounts.mark_email_verified(account.id).await?;

        info!(account_id = %account.id, event = "email_verified", "Email verified");
        Ok(())
    }

    /// Send a fresh phone verification code by SMS
    ///
    /// The SMS goes out first; the digest is only stored once the provider
    /// accepted it, so a failed send leaves no usable code behind.
    pub async fn request_phone_verification(&self, account_id: Uuid) -> DomainResult<()> {
        let account = self.load_account(account_id).await?;
        let phone = Self::phone_of(&account)?;

        if account.phone_verified {
            return Err(VerificationError::PhoneAlreadyVerified.into());
        }

        let code = VerificationCode::generate();
        let body = format!("Your verification code is {}", code.as_str());

        let message_id = self.sms.send_sms(phone, &body).await.map_err(|e| {
            warn!(
                account_id = %account.id,
                phone = %mask_phone_number(phone),
                provider = self.sms.provider_name(),
                error = %e,
                "Failed to send verification SMS"
            );
            VerificationError::SmsFailure
        })?;

        self.accounts
            .set_phone_verification(account.id, &code.digest_for(phone))
            .await?;

        info!(
            account_id = %account.id,
            phone = %mask_phone_number(phone),
            message_id = %message_id,
            event = "phone_verification_requested",
            "Phone verification code sent"
        );
        Ok(())
    }

    /// Check a phone verification code
    pub async fn confirm_phone_verification(&self, account_id: Uuid, code: &str) -> DomainResult<()> {
        let account = self.load_account(account_id).await?;
        let phone = Self::phone_of(&account)?;

        if account.phone_verified {
            return Err(VerificationError::PhoneAlreadyVerified.into());
        }

        if !Self::code_matches(account.phone_verification_code_digest.as_deref(), code, phone) {
            info!(account_id = %account.id, event = "phone_verification_failed", "Phone verification rejected");
            return Err(VerificationError::InvalidVerificationCode.into());
        }

        self.accounts.mark_phone_verified(account.id).await?;

        info!(account_id = %account.id, event = "phone_verified", "Phone verified");
        Ok(())
    }

    async fn load_account(&self, account_id: Uuid) -> DomainResult<Account> {
        self.accounts
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                resource: "account".to_string(),
            })
    }

    fn phone_of(account: &Account) -> Result<&str, VerificationError> {
        account
            .phone
            .as_deref()
            .filter(|phone| !phone.trim().is_empty())
            .ok_or(VerificationError::PhoneNumberNotFoundInDatabase)
    }

    fn code_matches(stored: Option<&str>, input: &str, target: &str) -> bool {
        match (stored, VerificationCode::parse(input)) {
            (Some(stored), Some(code)) => digests_match(stored, &code.digest_for(target)),
            _ => false,
        }
    }
}

/// Render a duration like `1 hours, 30 minutes`
///
/// Zero components are omitted; a zero duration is `0 seconds`.
pub fn humanize_duration(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    let (hours, minutes, seconds) = (total / 3600, (total / 60) % 60, total % 60);

    let parts: Vec<String> = [(hours, "hours"), (minutes, "minutes"), (seconds, "seconds")]
        .iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| format!("{} {}", value, unit))
        .collect();

    if parts.is_empty() {
        "0 seconds".to_string()
    } else {
        parts.join(", ")
    }
}
