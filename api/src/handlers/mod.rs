pub mod error;

pub use error::{handle_domain_error, invalid_body_response, json_error_handler, status_for, validation_error_response};
