//! Account input validation rules

use once_cell::sync::Lazy;
use regex::Regex;

/// Minimum accepted password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
});

/// Check the general shape of an email address
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Passwords only need to meet the minimum length
pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
}

/// Lowercase and trim an email address before storage or lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
