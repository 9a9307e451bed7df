//! Verification service module for email and phone ownership
//!
//! This module provides:
//! - Six-digit code generation from the OS CSPRNG
//! - Target-salted digests, never the plaintext, in the account row
//! - Email delivery through the notification queue, with expiry
//! - Direct SMS delivery for phone numbers

mod config;
mod service;
mod traits;

#[cfg(test)]
mod tests;

pub use config::VerificationServiceConfig;
pub use service::{humanize_duration, VerificationService};
pub use traits::SmsSender;
