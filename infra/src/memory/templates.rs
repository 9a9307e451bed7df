//! In-memory template store

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use us_core::domain::entities::notification::EmailTemplate;
use us_core::errors::DomainError;
use us_core::repositories::TemplateRepository;

/// The email verification template, as seeded by the migrations
pub fn verification_email_template() -> EmailTemplate {
    EmailTemplate {
        code: "EMAIL_VERIFICATION".to_string(),
        name: "Email verification".to_string(),
        subject: "Verify your email address".to_string(),
        body: "Hello {{FirstName}},\n\nYour verification code is {{VerificationCode}}.\n\
               It expires in {{ExpiryTime}}.\n\n\
               If you did not request this code you can ignore this message."
            .to_string(),
        params: vec![
            "FirstName".to_string(),
            "VerificationCode".to_string(),
            "ExpiryTime".to_string(),
        ],
    }
}

#[derive(Clone, Default)]
pub struct InMemoryTemplateRepository {
    templates: Arc<RwLock<HashMap<String, EmailTemplate>>>,
}

impl InMemoryTemplateRepository {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding the seeded templates
    pub fn seeded() -> Self {
        Self::new().with_template(verification_email_template())
    }

    pub fn with_template(self, template: EmailTemplate) -> Self {
        if let Ok(mut templates) = self.templates.write() {
            templates.insert(template.code.clone(), template);
        }
        self
    }
}

#[async_trait]
impl TemplateRepository for InMemoryTemplateRepository {
    async fn find_by_code(&self, code: &str) -> Result<Option<EmailTemplate>, DomainError> {
        let templates = self.templates.read().map_err(|_| DomainError::Internal {
            message: "template store lock poisoned".to_string(),
        })?;
        Ok(templates.get(code).cloned())
    }
}
