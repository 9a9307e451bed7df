//! Mock queue and transports for notification tests

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use crate::domain::entities::notification::{EmailTemplate, OutgoingEmail};
use crate::services::notification::{EmailTransport, TaskQueue};

/// In-process FIFO per queue name
pub struct MockTaskQueue {
    messages: Mutex<HashMap<String, VecDeque<Vec<u8>>>>,
    pub should_fail_publish: bool,
    receive_errors: Mutex<u32>,
}

impl MockTaskQueue {
    pub fn new(should_fail_publish: bool) -> Self {
        Self {
            messages: Mutex::new(HashMap::new()),
            should_fail_publish,
            receive_errors: Mutex::new(0),
        }
    }

    /// The next `count` receives fail
    pub fn fail_next_receives(&self, count: u32) {
        *self.receive_errors.lock().unwrap() = count;
    }

    pub fn push(&self, queue: &str, payload: Vec<u8>) {
        self.messages
            .lock()
            .unwrap()
            .entry(queue.to_string())
            .or_default()
            .push_back(payload);
    }

    pub fn pending(&self, queue: &str) -> Vec<Vec<u8>> {
        self.messages
            .lock()
            .unwrap()
            .get(queue)
            .map(|q| q.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TaskQueue for MockTaskQueue {
    async fn publish(&self, queue: &str, payload: Vec<u8>) -> Result<(), String> {
        if self.should_fail_publish {
            return Err("queue unavailable".to_string());
        }
        self.push(queue, payload);
        Ok(())
    }

    async fn receive(&self, queue: &str, timeout: Duration) -> Result<Option<Vec<u8>>, String> {
        {
            let mut errors = self.receive_errors.lock().unwrap();
            if *errors > 0 {
                *errors -= 1;
                return Err("connection reset".to_string());
            }
        }

        let next = self
            .messages
            .lock()
            .unwrap()
            .get_mut(queue)
            .and_then(|q| q.pop_front());

        if next.is_none() {
            tokio::time::sleep(timeout.min(Duration::from_millis(10))).await;
        }
        Ok(next)
    }
}

/// Queue whose receive never returns
pub struct StuckQueue;

#[async_trait]
impl TaskQueue for StuckQueue {
    async fn publish(&self, _queue: &str, _payload: Vec<u8>) -> Result<(), String> {
        Ok(())
    }

    async fn receive(&self, _queue: &str, _timeout: Duration) -> Result<Option<Vec<u8>>, String> {
        std::future::pending().await
    }
}

/// Records every email it is asked to send
pub struct RecordingTransport {
    pub sent: Mutex<Vec<OutgoingEmail>>,
    pub should_fail: bool,
}

impl RecordingTransport {
    pub fn new(should_fail: bool) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            should_fail,
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl EmailTransport for RecordingTransport {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), String> {
        if self.should_fail {
            return Err("smtp relay refused".to_string());
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

pub fn verification_template() -> EmailTemplate {
    EmailTemplate {
        code: "EMAIL_VERIFICATION".to_string(),
        name: "Email verification".to_string(),
        subject: "Verify your email".to_string(),
        body: "Hello {{FirstName}}, your code is {{VerificationCode}} (valid {{ExpiryTime}})".to_string(),
        params: vec![
            "FirstName".to_string(),
            "VerificationCode".to_string(),
            "ExpiryTime".to_string(),
        ],
    }
}
