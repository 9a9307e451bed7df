//! Credential verification: one-way password digests.

mod hasher;

pub use hasher::{BcryptPasswordHasher, PasswordHasher, DEFAULT_BCRYPT_COST};
