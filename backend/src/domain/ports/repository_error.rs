//! Error shared by every persistence port.

use crate::domain::Error;

use super::define_port_error;

/// Unique constraint on `users.username`.
pub const USERS_USERNAME_KEY: &str = "users_username_key";
/// Unique constraint on `users.email`.
pub const USERS_EMAIL_KEY: &str = "users_email_key";
/// Unique constraint on `categories.name`.
pub const CATEGORIES_NAME_KEY: &str = "categories_name_key";

define_port_error! {
    /// Failures raised by repository adapters.
    pub enum RepositoryError {
        /// The backing store could not be reached.
        Connection { message: String } => "repository connection failed: {message}",
        /// A query or mutation failed while executing.
        Query { message: String } => "repository query failed: {message}",
        /// A write collided with a unique constraint.
        Conflict { constraint: String } => "unique constraint {constraint} violated",
    }
}

impl RepositoryError {
    /// Whether this is a conflict on the named constraint.
    pub fn is_conflict_on(&self, name: &str) -> bool {
        matches!(self, Self::Conflict { constraint } if constraint == name)
    }
}

impl From<RepositoryError> for Error {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Connection { message } => {
                Self::service_unavailable(format!("storage unavailable: {message}"))
            }
            RepositoryError::Query { message } => {
                Self::internal(format!("storage query failed: {message}"))
            }
            RepositoryError::Conflict { constraint } => {
                Self::conflict(format!("conflicts with existing record ({constraint})"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(RepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(RepositoryError::query("syntax"), ErrorCode::InternalError)]
    #[case(RepositoryError::conflict(USERS_EMAIL_KEY), ErrorCode::Conflict)]
    fn maps_to_domain_codes(#[case] err: RepositoryError, #[case] code: ErrorCode) {
        assert_eq!(Error::from(err).code(), code);
    }

    #[rstest]
    fn conflict_matches_constraint_name() {
        let err = RepositoryError::conflict(USERS_USERNAME_KEY);
        assert!(err.is_conflict_on(USERS_USERNAME_KEY));
        assert!(!err.is_conflict_on(USERS_EMAIL_KEY));
    }
}
