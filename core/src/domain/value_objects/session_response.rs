//! Session response value object returned by login and refresh.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::token::{AccessToken, RefreshToken, TOKEN_TYPE};

/// Access/refresh pair handed to the client after a successful login
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionResponse {
    /// Signed bearer token for API authentication
    pub access_token: String,

    /// Opaque capability for obtaining a new access token
    pub refresh_token: String,

    /// Always `"Bearer"`
    pub token_type: String,

    /// Seconds until the access token expires
    pub expires_in: i64,
}

impl SessionResponse {
    pub fn from_tokens(access: &AccessToken, refresh: &RefreshToken, now: DateTime<Utc>) -> Self {
        Self {
            access_token: access.token.clone(),
            refresh_token: refresh.token.clone(),
            token_type: TOKEN_TYPE.to_string(),
            expires_in: access.seconds_remaining(now),
        }
    }
}
