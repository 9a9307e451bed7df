use async_trait::async_trait;
use tracing::{error, warn};

use crate::errors::AuthError;

/// Default bcrypt work factor
pub const DEFAULT_BCRYPT_COST: u32 = bcrypt::DEFAULT_COST;

/// Salted, deliberately slow one-way password hashing
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Produce a digest embedding its own salt
    ///
    /// # Returns
    /// * `Err(AuthError::HashingError)` - Only on entropy or allocation failure
    async fn hash_secret(&self, plaintext: &str) -> Result<String, AuthError>;

    /// Check a plaintext against a stored digest
    ///
    /// A mismatch is `false`, never an error. A malformed digest is also
    /// `false`.
    async fn verify_secret(&self, plaintext: &str, digest: &str) -> bool;
}

/// bcrypt-backed hasher
///
/// bcrypt is CPU bound, so both operations run on the blocking thread pool
/// instead of stalling the async executor.
#[derive(Debug, Clone)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash_secret(&self, plaintext: &str) -> Result<String, AuthError> {
        let plaintext = plaintext.to_owned();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost))
            .await
            .map_err(|e| {
                error!(error = %e, "Password hashing task failed");
                AuthError::HashingError
            })?
            .map_err(|e| {
                error!(error = %e, "Password hashing failed");
                AuthError::HashingError
            })
    }

    async fn verify_secret(&self, plaintext: &str, digest: &str) -> bool {
        let plaintext = plaintext.to_owned();
        let digest = digest.to_owned();

        match tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &digest)).await {
            Ok(Ok(matches)) => matches,
            Ok(Err(e)) => {
                warn!(error = %e, "Stored password digest could not be parsed");
                false
            }
            Err(e) => {
                error!(error = %e, "Password verification task failed");
                false
            }
        }
    }
}
