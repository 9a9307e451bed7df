//! Email and phone ownership verification handlers

pub mod email;
pub mod phone;

pub use email::{confirm_email_code, send_email_code};
pub use phone::{confirm_phone_code, send_phone_code};
