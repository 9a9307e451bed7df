//! Email template lookup.

use async_trait::async_trait;

use crate::domain::entities::notification::EmailTemplate;
use crate::errors::DomainError;

#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// Find a template by its unique code
    async fn find_by_code(&self, code: &str) -> Result<Option<EmailTemplate>, DomainError>;
}
