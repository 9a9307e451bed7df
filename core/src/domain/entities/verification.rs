//! One-time verification codes.

use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, Rng};
use sha2::{Digest, Sha256};
use std::fmt;

/// Number of decimal digits in a verification code
pub const CODE_LENGTH: usize = 6;

const CODE_SPACE: u32 = 1_000_000;

/// A plaintext verification code.
///
/// Only its digest is ever persisted. `Debug` output is redacted so the code
/// cannot leak into logs.
#[derive(Clone, PartialEq, Eq)]
pub struct VerificationCode(String);

impl VerificationCode {
    /// Draws a fixed-width decimal code from the operating system CSPRNG
    pub fn generate() -> Self {
        let value = OsRng.gen_range(0..CODE_SPACE);
        Self(format!("{:0width$}", value, width = CODE_LENGTH))
    }

    /// Accepts user input only if it has the exact code shape
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.len() == CODE_LENGTH && trimmed.chars().all(|c| c.is_ascii_digit()) {
            Some(Self(trimmed.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Digest bound to the delivery target
    pub fn digest_for(&self, target: &str) -> String {
        code_digest(&self.0, target)
    }
}

impl fmt::Debug for VerificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VerificationCode(******)")
    }
}

/// Hex SHA-256 over `code || target`.
///
/// Salting with the email address or phone number means a digest copied from
/// one account can never validate a code for another.
pub fn code_digest(code: &str, target: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    hasher.update(target.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compares two digests in constant time
pub fn digests_match(expected: &str, actual: &str) -> bool {
    constant_time_eq(expected.as_bytes(), actual.as_bytes())
}
