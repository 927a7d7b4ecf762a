//! Port for one-way password hashing.

use crate::domain::{Password, PasswordHash};

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHasherError {
        /// Hash could not be computed.
        Hashing { message: String } => "password hashing failed: {message}",
        /// Stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

/// Hash new passwords and check candidates against stored hashes.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` with a fresh salt.
    fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHasherError>;

    /// `true` when `password` matches `hash`.
    fn verify(&self, password: &Password, hash: &PasswordHash) -> Result<bool, PasswordHasherError>;
}
