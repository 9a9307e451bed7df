//! Signing and verification of session tokens

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::{rngs::OsRng, RngCore};
use tracing::debug;
use uuid::Uuid;

use crate::domain::entities::token::{AccessToken, Claims, RefreshToken};
use crate::errors::TokenError;

use super::config::TokenServiceConfig;

/// Random bytes behind each refresh token
const REFRESH_TOKEN_BYTES: usize = 32;

/// Mints signed access tokens and opaque refresh tokens
///
/// Holds no store; persistence is the session layer's job.
pub struct TokenService {
    config: TokenServiceConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `config` - Signing secret, issuer and lifetimes
    pub fn new(config: TokenServiceConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        // HS256 only: a token signed with any other algorithm is rejected
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    /// Signs a new access token for an account
    ///
    /// The signature covers the account id, email and expiry.
    ///
    /// # Returns
    ///
    /// * `Ok(AccessToken)` - Unsaved row expiring `access_ttl` after `now`
    /// * `Err(TokenError::TokenGenerationFailed)` - Encoding failed
    pub fn mint_access_token(
        &self,
        account_id: Uuid,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<AccessToken, TokenError> {
        let expires_at = now + self.config.access_ttl();
        let claims = Claims::new(account_id, email, &self.config.issuer, now, expires_at);
        let token = self.encode_jwt(&claims)?;

        Ok(AccessToken::new(account_id, token, expires_at))
    }

    /// Generates an unguessable refresh token
    ///
    /// The token is hex-encoded randomness from the operating system CSPRNG.
    /// It is never decoded, only compared for equality.
    pub fn generate_refresh_token(&self, account_id: Uuid, now: DateTime<Utc>) -> RefreshToken {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);

        RefreshToken::new(
            account_id,
            hex::encode(bytes),
            now + self.config.refresh_ttl(),
        )
    }

    /// Encodes claims into a JWT
    pub(crate) fn encode_jwt(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|_| TokenError::TokenGenerationFailed)
    }

    /// Verifies signature, algorithm, issuer and expiry of an access token
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - The decoded claims if valid
    /// * `Err(TokenError::TokenExpired)` - The expiry claim has passed
    /// * `Err(TokenError::InvalidToken)` - Any other failure
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::TokenExpired,
                kind => {
                    debug!(reason = ?kind, "Access token rejected");
                    TokenError::InvalidToken
                }
            })
    }
}
