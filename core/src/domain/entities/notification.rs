//! Notification delivery entities.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A delivery request travelling through the task queue.
///
/// Never persisted outside the queue. `data` carries the template parameters,
/// including the plaintext one-time code; the digest never leaves the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationTask {
    pub template_code: String,
    pub recipient: String,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

impl VerificationTask {
    pub fn new(template_code: impl Into<String>, recipient: impl Into<String>) -> Self {
        Self {
            template_code: template_code.into(),
            recipient: recipient.into(),
            data: BTreeMap::new(),
        }
    }

    /// Adds a template parameter
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn from_bytes(payload: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(payload)
    }
}

/// A stored email template.
///
/// `params` lists the parameters a task must supply; `subject` and `body` use
/// `{{Name}}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailTemplate {
    pub code: String,
    pub name: String,
    pub subject: String,
    pub body: String,
    pub params: Vec<String>,
}

/// A fully rendered message ready for a transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingEmail {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}
