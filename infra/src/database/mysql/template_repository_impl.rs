//! MySQL implementation of the TemplateRepository trait.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::MySqlPool;

use us_core::domain::entities::notification::EmailTemplate;
use us_core::errors::DomainError;
use us_core::repositories::TemplateRepository;

use super::{column, db_error};

/// Email templates keyed by `code`; `params` is a JSON array of names
pub struct MySqlTemplateRepository {
    pool: MySqlPool,
}

impl MySqlTemplateRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TemplateRepository for MySqlTemplateRepository {
    async fn find_by_code(&self, code: &str) -> Result<Option<EmailTemplate>, DomainError> {
        let row = sqlx::query(
            "SELECT code, name, subject, body, params FROM email_templates WHERE code = ? LIMIT 1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load email template", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let params: Json<Vec<String>> = column(&row, "params")?;
        Ok(Some(EmailTemplate {
            code: column(&row, "code")?,
            name: column(&row, "name")?,
            subject: column(&row, "subject")?,
            body: column(&row, "body")?,
            params: params.0,
        }))
    }
}
