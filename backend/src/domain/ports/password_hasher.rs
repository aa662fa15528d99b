//! Port for one-way password hashing.
use crate::domain::Error;

use super::define_port_error;

define_port_error! {
    pub enum PasswordHashError {
        /// Hashing the new password failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// The stored hash could not be parsed.
        Malformed { message: String } => "stored password hash is malformed: {message}",
    }
}

impl From<PasswordHashError> for Error {
    fn from(value: PasswordHashError) -> Self {
        Self::internal(value.to_string())
    }
}

/// Produces and checks salted password hashes.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// `Ok(false)` for a wrong password; errors only for unusable hashes.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError>;
}
