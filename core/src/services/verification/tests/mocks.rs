//! Mock implementations for testing verification service

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::domain::entities::account::Account;
use crate::domain::entities::notification::VerificationTask;
use crate::repositories::MockAccountRepository;
use crate::services::notification::tests::mocks::MockTaskQueue;
use crate::services::notification::NotificationDispatcher;
use crate::services::verification::{SmsSender, VerificationService, VerificationServiceConfig};

// Mock SMS sender for testing
pub struct MockSmsSender {
    pub sent_messages: Arc<Mutex<HashMap<String, String>>>,
    pub should_fail: bool,
}

impl MockSmsSender {
    pub fn new(should_fail: bool) -> Self {
        Self {
            sent_messages: Arc::new(Mutex::new(HashMap::new())),
            should_fail,
        }
    }

    /// Code embedded in the last message sent to `phone`
    pub fn get_sent_code(&self, phone: &str) -> Option<String> {
        self.sent_messages
            .lock()
            .unwrap()
            .get(phone)
            .and_then(|body| body.rsplit(' ').next().map(str::to_string))
    }
}

#[async_trait]
impl SmsSender for MockSmsSender {
    async fn send_sms(&self, phone: &str, body: &str) -> Result<String, String> {
        if self.should_fail {
            return Err("SMS service error".to_string());
        }
        self.sent_messages
            .lock()
            .unwrap()
            .insert(phone.to_string(), body.to_string());
        Ok(format!("mock-msg-{}", uuid::Uuid::new_v4()))
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

pub const EMAIL: &str = "alice@example.com";
pub const PHONE: &str = "+14155552671";

pub struct Fixture {
    pub accounts: Arc<MockAccountRepository>,
    pub queue: Arc<MockTaskQueue>,
    pub sms: Arc<MockSmsSender>,
    pub service: VerificationService<MockAccountRepository>,
    pub account: Account,
}

impl Fixture {
    /// Plaintext code from the most recently queued email task
    pub fn queued_code(&self) -> Option<String> {
        self.queue
            .pending("email_queue")
            .last()
            .and_then(|payload| VerificationTask::from_bytes(payload).ok())
            .and_then(|task| task.data.get("VerificationCode").cloned())
    }

    pub async fn stored(&self) -> Account {
        self.accounts.get(self.account.id).await.unwrap()
    }
}

pub async fn fixture_with(fail_publish: bool, fail_sms: bool, config: VerificationServiceConfig) -> Fixture {
    let accounts = Arc::new(MockAccountRepository::new());
    let queue = Arc::new(MockTaskQueue::new(fail_publish));
    let sms = Arc::new(MockSmsSender::new(fail_sms));
    let dispatcher = Arc::new(NotificationDispatcher::new(queue.clone(), "email_queue"));

    let account = Account::new(EMAIL.to_string(), "digest".to_string(), Some(PHONE.to_string()))
        .with_names(Some("Alice".to_string()), None);
    accounts.insert(account.clone()).await;

    let service = VerificationService::new(accounts.clone(), dispatcher, sms.clone(), config);

    Fixture {
        accounts,
        queue,
        sms,
        service,
        account,
    }
}

pub async fn fixture() -> Fixture {
    fixture_with(false, false, VerificationServiceConfig::default()).await
}
