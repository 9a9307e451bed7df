//! Mock implementation of TemplateRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::entities::notification::EmailTemplate;
use crate::errors::DomainError;

use super::trait_::TemplateRepository;

pub struct MockTemplateRepository {
    templates: Mutex<HashMap<String, EmailTemplate>>,
}

impl MockTemplateRepository {
    pub fn new() -> Self {
        Self {
            templates: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_template(self, template: EmailTemplate) -> Self {
        self.templates
            .lock()
            .unwrap()
            .insert(template.code.clone(), template);
        self
    }
}

impl Default for MockTemplateRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TemplateRepository for MockTemplateRepository {
    async fn find_by_code(&self, code: &str) -> Result<Option<EmailTemplate>, DomainError> {
        Ok(self.templates.lock().unwrap().get(code).cloned())
    }
}
