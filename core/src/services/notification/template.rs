//! `{{Name}}` placeholder rendering for stored email templates

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::BTreeMap;

use crate::domain::entities::notification::{EmailTemplate, OutgoingEmail, VerificationTask};
use crate::errors::NotificationError;

// Accepts `{{Name}}`, `{{ Name }}` and `{{.Name}}`
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*\.?([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").unwrap());

/// Render a template for one task
///
/// Every parameter the template declares, and every placeholder it uses,
/// must be present in the task data.
pub fn render_email(
    template: &EmailTemplate,
    task: &VerificationTask,
) -> Result<OutgoingEmail, NotificationError> {
    if let Some(missing) = template.params.iter().find(|p| !task.data.contains_key(*p)) {
        return Err(NotificationError::MissingTemplateParameter {
            param: missing.clone(),
        });
    }

    Ok(OutgoingEmail {
        recipient: task.recipient.clone(),
        subject: substitute(&template.subject, &task.data)?,
        body: substitute(&template.body, &task.data)?,
    })
}

fn substitute(text: &str, data: &BTreeMap<String, String>) -> Result<String, NotificationError> {
    if let Some(caps) = PLACEHOLDER
        .captures_iter(text)
        .find(|caps| !data.contains_key(&caps[1]))
    {
        return Err(NotificationError::MissingTemplateParameter {
            param: caps[1].to_string(),
        });
    }

    Ok(PLACEHOLDER
        .replace_all(text, |caps: &Captures| {
            data.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned())
}
