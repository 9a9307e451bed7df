//! Unit tests for registration service

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::domain::entities::account::Account;
use crate::errors::DomainError;
use crate::repositories::{AccountRepository, MockAccountRepository};
use crate::services::credentials::{BcryptPasswordHasher, PasswordHasher};
use crate::services::registration::{
    AccountReplicator, NoopReplicator, RegistrationRequest, RegistrationService,
};

struct RecordingReplicator {
    replicated: Mutex<Vec<Uuid>>,
    should_fail: bool,
}

impl RecordingReplicator {
    fn new(should_fail: bool) -> Self {
        Self {
            replicated: Mutex::new(Vec::new()),
            should_fail,
        }
    }
}

#[async_trait]
impl AccountReplicator for RecordingReplicator {
    async fn replicate(&self, account: &Account) -> Result<(), String> {
        self.replicated.lock().unwrap().push(account.id);
        if self.should_fail {
            return Err("mirror unreachable".to_string());
        }
        Ok(())
    }
}

fn service_with(
    replicator: Arc<dyn AccountReplicator>,
) -> (Arc<MockAccountRepository>, RegistrationService<MockAccountRepository>) {
    let accounts = Arc::new(MockAccountRepository::new());
    let service = RegistrationService::new(
        accounts.clone(),
        Arc::new(BcryptPasswordHasher::new(4)),
        replicator,
    );
    (accounts, service)
}

fn request() -> RegistrationRequest {
    RegistrationRequest {
        email: "Alice@Example.com".to_string(),
        password: "Secret123!".to_string(),
        phone: Some("+1 (415) 555-2671".to_string()),
        first_name: Some("Alice".to_string()),
        last_name: Some("  ".to_string()),
    }
}

#[tokio::test]
async fn test_register_success() {
    let replicator = Arc::new(RecordingReplicator::new(false));
    let (accounts, service) = service_with(replicator.clone());

    let account = service.register(request()).await.unwrap();

    assert_eq!(account.email, "alice@example.com");
    assert_eq!(account.phone.as_deref(), Some("+14155552671"));
    assert_eq!(account.first_name.as_deref(), Some("Alice"));
    assert_eq!(account.last_name, None);
    assert!(!account.email_verified);
    assert!(!account.phone_verified);
    assert!(BcryptPasswordHasher::new(4)
        .verify_secret("Secret123!", &account.password_hash)
        .await);

    assert!(accounts.find_by_email("alice@example.com").await.unwrap().is_some());
    assert_eq!(*replicator.replicated.lock().unwrap(), vec![account.id]);
}

#[tokio::test]
async fn test_register_without_phone() {
    let (_, service) = service_with(Arc::new(NoopReplicator));
    let request = RegistrationRequest {
        phone: None,
        ..request()
    };

    let account = service.register(request).await.unwrap();
    assert!(account.phone.is_none());
}

#[tokio::test]
async fn test_invalid_input_is_rejected() {
    let (accounts, service) = service_with(Arc::new(NoopReplicator));

    let cases = [
        RegistrationRequest { email: "not-an-email".to_string(), ..request() },
        RegistrationRequest { password: "short".to_string(), ..request() },
        RegistrationRequest { phone: Some("0123".to_string()), ..request() },
    ];

    for case in cases {
        let result = service.register(case).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }
    assert!(accounts.find_by_email("alice@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_email_and_phone_conflict() {
    let (_, service) = service_with(Arc::new(NoopReplicator));
    service.register(request()).await.unwrap();

    let same_email = service
        .register(RegistrationRequest { phone: None, ..request() })
        .await;
    let same_phone = service
        .register(RegistrationRequest {
            email: "bob@example.com".to_string(),
            ..request()
        })
        .await;

    assert!(matches!(same_email, Err(DomainError::Conflict { .. })));
    assert!(matches!(same_phone, Err(DomainError::Conflict { .. })));
}

#[tokio::test]
async fn test_replication_failure_keeps_account() {
    let replicator = Arc::new(RecordingReplicator::new(true));
    let (accounts, service) = service_with(replicator.clone());

    let account = service.register(request()).await.unwrap();

    assert!(accounts.find_by_id(account.id).await.unwrap().is_some());
    assert_eq!(replicator.replicated.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_rejected_registration_is_not_replicated() {
    let replicator = Arc::new(RecordingReplicator::new(false));
    let (_, service) = service_with(replicator.clone());

    let _ = service
        .register(RegistrationRequest { password: "short".to_string(), ..request() })
        .await;

    assert!(replicator.replicated.lock().unwrap().is_empty());
}
