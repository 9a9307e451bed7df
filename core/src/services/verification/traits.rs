//! SMS delivery port

use async_trait::async_trait;

/// Outbound SMS transport
#[async_trait]
pub trait SmsSender: Send + Sync {
    /// Send a text message
    ///
    /// # Returns
    /// * `Ok(String)` - Provider message id
    /// * `Err(String)` - Provider error, for logs only
    async fn send_sms(&self, phone: &str, body: &str) -> Result<String, String>;

    /// Short provider name for logs
    fn provider_name(&self) -> &'static str;
}
