use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of the email and phone confirm endpoints
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ConfirmCodeRequest {
    #[validate(length(min = 1, max = 16))]
    pub code: String,
}
