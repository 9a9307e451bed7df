//! Token service module for JWT management
//!
//! This module handles:
//! - HS256 access token signing and verification
//! - Opaque refresh token generation
//! - Background cleanup of expired tokens

mod cleanup;
mod config;
mod service;


pub use cleanup::TokenCleanupService;
pub use config::{TokenCleanupConfig, TokenServiceConfig};
pub use service::TokenService;
