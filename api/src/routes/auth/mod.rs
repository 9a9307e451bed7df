//! Registration and session route handlers

pub mod login;
pub mod logout;
pub mod refresh;
pub mod register;

pub use login::login;
pub use logout::logout;
pub use refresh::refresh_token;
pub use register::register;
