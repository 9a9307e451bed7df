pub mod account;
pub mod auth;
pub mod verification;

pub use account::AccountResponse;
pub use auth::{LoginRequest, LogoutRequest, RefreshTokenRequest, RegisterRequest};
pub use verification::ConfirmCodeRequest;

// Response envelopes shared with other crates
pub use us_shared::types::{ApiResponse, ErrorResponse, MessageResponse};
