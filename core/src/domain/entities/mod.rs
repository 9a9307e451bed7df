//! Domain entities representing core business objects.

pub mod account;
pub mod notification;
pub mod token;
pub mod verification;


// Re-export commonly used types
pub use account::Account;
pub use notification::{EmailTemplate, OutgoingEmail, VerificationTask};
pub use token::{AccessToken, Claims, RefreshToken, TOKEN_TYPE};
pub use verification::{code_digest, digests_match, VerificationCode, CODE_LENGTH};
