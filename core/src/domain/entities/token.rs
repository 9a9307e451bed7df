//! Session token entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token type reported to clients
pub const TOKEN_TYPE: &str = "Bearer";

/// Claims carried by a signed access token.
///
/// `jti` is random per mint, so a revoked bearer string is never reissued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: String,

    /// Account email at issuance time
    pub email: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Unique token ID
    pub jti: String,
}

impl Claims {
    pub fn new(account_id: Uuid, email: &str, issuer: &str, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: account_id.to_string(),
            email: email.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            iss: issuer.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Parses the subject claim into an account ID
    pub fn account_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}

/// A persisted access token row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub id: Uuid,
    pub account_id: Uuid,
    /// Signed bearer string, unique system-wide
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn new(account_id: Uuid, token: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            token,
            expires_at,
            created_at: Utc::now(),
        }
    }

    /// Valid strictly before its expiry; expired rows are inert
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Whole seconds left before expiry, never negative
    pub fn seconds_remaining(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds().max(0)
    }
}

/// A persisted refresh token row.
///
/// Refresh tokens are opaque random capabilities looked up by equality; they
/// are never decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    pub id: Uuid,
    pub account_id: Uuid,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl RefreshToken {
    pub fn new(account_id: Uuid, token: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            token,
            expires_at,
            created_at: Utc::now(),
        }
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}
