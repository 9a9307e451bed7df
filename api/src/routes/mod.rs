//! Route handlers, grouped by concern
//!
//! The route table itself lives in [`crate::app::create_app`].

pub mod account;
pub mod auth;
pub mod verification;
