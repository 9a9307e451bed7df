//! Persistence ports implemented by the infrastructure layer.

pub mod account;
pub mod template;
pub mod token;

pub use account::AccountRepository;
pub use template::TemplateRepository;
pub use token::TokenRepository;

#[cfg(test)]
pub use account::MockAccountRepository;
#[cfg(test)]
pub use template::MockTemplateRepository;
#[cfg(test)]
pub use token::MockTokenRepository;
