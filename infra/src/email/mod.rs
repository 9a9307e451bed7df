//! Email transports implementing `us_core`'s `EmailTransport` port
//!
//! Rendered bodies carry one-time codes; transports log the recipient and
//! subject only.

use std::sync::Arc;
use std::time::Duration;

use us_core::services::notification::EmailTransport;
use us_shared::config::{EmailConfig, EmailProvider};

use crate::InfrastructureError;

pub mod log_transport;
pub mod mailjet;
pub mod sendgrid;

pub use log_transport::LogEmailTransport;
pub use mailjet::MailjetTransport;
pub use sendgrid::SendgridTransport;

/// Build the transport selected by `EMAIL_PROVIDER`
pub fn create_email_transport(
    config: &EmailConfig,
) -> Result<Arc<dyn EmailTransport>, InfrastructureError> {
    match config.provider {
        EmailProvider::Log => {
            tracing::warn!("Using log email transport; no messages will be delivered");
            Ok(Arc::new(LogEmailTransport::new()))
        }
        EmailProvider::Sendgrid => Ok(Arc::new(SendgridTransport::new(config)?)),
        EmailProvider::Mailjet => Ok(Arc::new(MailjetTransport::new(config)?)),
    }
}

/// HTTP client shared by the provider transports
pub(crate) fn http_client(timeout_seconds: u64) -> Result<reqwest::Client, InfrastructureError> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .build()?)
}

/// Domain part of an address, for logs
pub(crate) fn recipient_domain(address: &str) -> &str {
    address.rsplit_once('@').map(|(_, domain)| domain).unwrap_or("unknown")
}

/// Turn a non-success provider response into a transport error
pub(crate) async fn check_response(
    provider: &str,
    response: reqwest::Response,
) -> Result<(), String> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    tracing::error!(provider, status = %status, body = %body, "Email provider rejected message");
    Err(format!("{} responded with {}", provider, status))
}
