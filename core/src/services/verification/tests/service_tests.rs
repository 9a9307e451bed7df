//! Unit tests for verification service

use chrono::{Duration, Utc};

use crate::domain::entities::notification::VerificationTask;
use crate::domain::entities::verification::{code_digest, CODE_LENGTH};
use crate::errors::{DomainError, NotificationError, VerificationError};
use crate::repositories::AccountRepository;
use crate::services::verification::{humanize_duration, VerificationServiceConfig};

use super::mocks::{fixture, fixture_with, EMAIL, PHONE};

fn wrong_code(code: &str) -> String {
    if code == "000000" { "000001".to_string() } else { "000000".to_string() }
}

#[tokio::test]
async fn test_request_email_verification_queues_task() {
    let f = fixture().await;

    f.service.request_email_verification(f.account.id).await.unwrap();

    let pending = f.queue.pending("email_queue");
    assert_eq!(pending.len(), 1);
    let task = VerificationTask::from_bytes(&pending[0]).unwrap();
    assert_eq!(task.template_code, "EMAIL_VERIFICATION");
    assert_eq!(task.recipient, EMAIL);
    assert_eq!(task.data["FirstName"], "Alice");
    assert_eq!(task.data["ExpiryTime"], "30 minutes");

    let code = &task.data["VerificationCode"];
    assert_eq!(code.len(), CODE_LENGTH);

    let stored = f.stored().await;
    assert_eq!(stored.email_verification_code_digest, Some(code_digest(code, EMAIL)));
    assert!(stored.email_verification_expiry.unwrap() > Utc::now() + Duration::minutes(29));
}

#[tokio::test]
async fn test_plaintext_code_is_not_stored() {
    let f = fixture().await;
    f.service.request_email_verification(f.account.id).await.unwrap();

    let code = f.queued_code().unwrap();
    let stored = f.stored().await;
    assert_ne!(stored.email_verification_code_digest.as_deref(), Some(code.as_str()));
}

#[tokio::test]
async fn test_confirm_email_with_correct_code() {
    let f = fixture().await;
    f.service.request_email_verification(f.account.id).await.unwrap();
    let code = f.queued_code().unwrap();

    f.service.confirm_email_verification(f.account.id, &code).await.unwrap();

    let stored = f.stored().await;
    assert!(stored.email_verified);
    assert!(stored.email_verification_code_digest.is_none());
    assert!(stored.email_verification_expiry.is_none());
}

#[tokio::test]
async fn test_confirm_email_with_wrong_code() {
    let f = fixture().await;
    f.service.request_email_verification(f.account.id).await.unwrap();
    let code = f.queued_code().unwrap();

    let result = f
        .service
        .confirm_email_verification(f.account.id, &wrong_code(&code))
        .await;

    assert!(matches!(
        result,
        Err(DomainError::Verification(VerificationError::InvalidVerificationCode))
    ));
    assert!(!f.stored().await.email_verified);

    // The right code still works afterwards
    f.service.confirm_email_verification(f.account.id, &code).await.unwrap();
}

#[tokio::test]
async fn test_confirm_email_rejects_malformed_input() {
    let f = fixture().await;
    f.service.request_email_verification(f.account.id).await.unwrap();

    for input in ["", "12345", "1234567", "12a456"] {
        let result = f.service.confirm_email_verification(f.account.id, input).await;
        assert!(matches!(
            result,
            Err(DomainError::Verification(VerificationError::InvalidVerificationCode))
        ));
    }
}

#[tokio::test]
async fn test_confirm_email_without_pending_code() {
    let f = fixture().await;

    let result = f.service.confirm_email_verification(f.account.id, "123456").await;
    assert!(matches!(
        result,
        Err(DomainError::Verification(VerificationError::InvalidVerificationCode))
    ));
}

#[tokio::test]
async fn test_expired_email_code_is_rejected() {
    let f = fixture().await;
    let digest = code_digest("123456", EMAIL);
    f.accounts
        .set_email_verification(f.account.id, &digest, Utc::now() - Duration::seconds(1))
        .await
        .unwrap();

    let result = f.service.confirm_email_verification(f.account.id, "123456").await;

    assert!(matches!(
        result,
        Err(DomainError::Verification(VerificationError::InvalidVerificationCode))
    ));
}

#[tokio::test]
async fn test_code_for_other_target_is_rejected() {
    let f = fixture().await;
    // Digest salted with someone else's address
    let digest = code_digest("123456", "mallory@example.com");
    f.accounts
        .set_email_verification(f.account.id, &digest, Utc::now() + Duration::minutes(5))
        .await
        .unwrap();

    let result = f.service.confirm_email_verification(f.account.id, "123456").await;

    assert!(matches!(
        result,
        Err(DomainError::Verification(VerificationError::InvalidVerificationCode))
    ));
}

#[tokio::test]
async fn test_new_request_replaces_pending_code() {
    let f = fixture().await;
    let digest = code_digest("111111", EMAIL);
    f.accounts
        .set_email_verification(f.account.id, &digest, Utc::now() + Duration::minutes(5))
        .await
        .unwrap();

    f.service.request_email_verification(f.account.id).await.unwrap();
    let code = f.queued_code().unwrap();

    if code != "111111" {
        let result = f.service.confirm_email_verification(f.account.id, "111111").await;
        assert!(result.is_err());
    }
    f.service.confirm_email_verification(f.account.id, &code).await.unwrap();
}

#[tokio::test]
async fn test_already_verified_email_fails_fast() {
    let f = fixture().await;
    f.accounts.mark_email_verified(f.account.id).await.unwrap();

    let request = f.service.request_email_verification(f.account.id).await;
    let confirm = f.service.confirm_email_verification(f.account.id, "123456").await;

    assert!(matches!(
        request,
        Err(DomainError::Verification(VerificationError::EmailAlreadyVerified))
    ));
    assert!(matches!(
        confirm,
        Err(DomainError::Verification(VerificationError::EmailAlreadyVerified))
    ));
    assert!(f.queue.pending("email_queue").is_empty());
}

#[tokio::test]
async fn test_publish_failure_is_reported() {
    let f = fixture_with(true, false, VerificationServiceConfig::default()).await;

    let result = f.service.request_email_verification(f.account.id).await;

    assert!(matches!(
        result,
        Err(DomainError::Notification(NotificationError::EmailTaskPublishingFailed { .. }))
    ));
}

#[tokio::test]
async fn test_unknown_account() {
    let f = fixture().await;

    let result = f.service.request_email_verification(uuid::Uuid::new_v4()).await;
    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_custom_expiry_is_humanized() {
    let config = VerificationServiceConfig {
        email_code_expiry_seconds: 5400,
        ..Default::default()
    };
    let f = fixture_with(false, false, config).await;

    f.service.request_email_verification(f.account.id).await.unwrap();

    let pending = f.queue.pending("email_queue");
    let task = VerificationTask::from_bytes(&pending[0]).unwrap();
    assert_eq!(task.data["ExpiryTime"], "1 hours, 30 minutes");
}

#[tokio::test]
async fn test_request_phone_verification_sends_sms_then_stores_digest() {
    let f = fixture().await;

    f.service.request_phone_verification(f.account.id).await.unwrap();

    let code = f.sms.get_sent_code(PHONE).unwrap();
    assert_eq!(code.len(), CODE_LENGTH);
    let stored = f.stored().await;
    assert_eq!(stored.phone_verification_code_digest, Some(code_digest(&code, PHONE)));
}

#[tokio::test]
async fn test_sms_failure_leaves_no_digest() {
    let f = fixture_with(false, true, VerificationServiceConfig::default()).await;

    let result = f.service.request_phone_verification(f.account.id).await;

    assert!(matches!(
        result,
        Err(DomainError::Verification(VerificationError::SmsFailure))
    ));
    assert!(f.stored().await.phone_verification_code_digest.is_none());
}

#[tokio::test]
async fn test_phone_missing() {
    let f = fixture().await;
    let mut account = f.stored().await;
    account.phone = None;
    f.accounts.insert(account).await;

    let request = f.service.request_phone_verification(f.account.id).await;
    let confirm = f.service.confirm_phone_verification(f.account.id, "123456").await;

    for result in [request, confirm] {
        assert!(matches!(
            result,
            Err(DomainError::Verification(
                VerificationError::PhoneNumberNotFoundInDatabase
            ))
        ));
    }
}

#[tokio::test]
async fn test_confirm_phone_verification() {
    let f = fixture().await;
    f.service.request_phone_verification(f.account.id).await.unwrap();
    let code = f.sms.get_sent_code(PHONE).unwrap();

    let wrong = f
        .service
        .confirm_phone_verification(f.account.id, &wrong_code(&code))
        .await;
    assert!(matches!(
        wrong,
        Err(DomainError::Verification(VerificationError::InvalidVerificationCode))
    ));

    f.service.confirm_phone_verification(f.account.id, &code).await.unwrap();

    let stored = f.stored().await;
    assert!(stored.phone_verified);
    assert!(stored.phone_verification_code_digest.is_none());

    let again = f.service.request_phone_verification(f.account.id).await;
    assert!(matches!(
        again,
        Err(DomainError::Verification(VerificationError::PhoneAlreadyVerified))
    ));
}

#[test]
fn test_humanize_duration() {
    assert_eq!(humanize_duration(Duration::zero()), "0 seconds");
    assert_eq!(humanize_duration(Duration::seconds(45)), "45 seconds");
    assert_eq!(humanize_duration(Duration::minutes(30)), "30 minutes");
    assert_eq!(humanize_duration(Duration::seconds(3600)), "1 hours");
    assert_eq!(
        humanize_duration(Duration::seconds(3600 + 120 + 5)),
        "1 hours, 2 minutes, 5 seconds"
    );
    assert_eq!(humanize_duration(Duration::seconds(-10)), "0 seconds");
}
