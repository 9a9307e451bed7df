//! SMS Service Module
//!
//! Senders implementing `us_core`'s `SmsSender` port:
//!
//! - **Mock**: logs a masked recipient and keeps messages in memory
//! - **Twilio**: production delivery (feature `twilio-sms`)
//!
//! Message bodies carry one-time codes and are never logged.

use std::sync::Arc;

use us_core::services::verification::SmsSender;
use us_shared::config::{SmsConfig, SmsProvider};

use crate::InfrastructureError;

pub mod mock_sms;

#[cfg(feature = "twilio-sms")]
pub mod twilio;

pub use mock_sms::{MockSmsSender, SentSms};

#[cfg(feature = "twilio-sms")]
pub use twilio::{TwilioConfig, TwilioSmsSender};


/// Build the sender selected by `SMS_PROVIDER`
///
/// A misconfigured provider is an error rather than a silent fallback, so a
/// deployment never believes it is texting users while it is not.
pub fn create_sms_sender(config: &SmsConfig) -> Result<Arc<dyn SmsSender>, InfrastructureError> {
    match config.provider {
        SmsProvider::Mock => {
            tracing::warn!("Using mock SMS sender; no messages will be delivered");
            Ok(Arc::new(MockSmsSender::new()))
        }
        #[cfg(feature = "twilio-sms")]
        SmsProvider::Twilio => {
            let twilio_config = TwilioConfig::from_sms_config(config)?;
            Ok(Arc::new(TwilioSmsSender::new(twilio_config)))
        }
        #[cfg(not(feature = "twilio-sms"))]
        SmsProvider::Twilio => Err(InfrastructureError::Config(
            "SMS_PROVIDER=twilio requires the twilio-sms feature".to_string(),
        )),
    }
}
