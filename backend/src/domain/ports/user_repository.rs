//! Port abstraction for account persistence.
use async_trait::async_trait;

use crate::domain::{User, UserId, UserProfile};

use super::RepositoryError;

/// Storage for accounts and their one-to-one profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user together with an empty profile.
    ///
    /// A duplicate username or email yields [`RepositoryError::Conflict`]
    /// naming the violated constraint.
    async fn create(&self, user: &User) -> Result<UserProfile, RepositoryError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError>;

    /// Exact, case-sensitive username lookup.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;

    async fn find_by_username_and_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, RepositoryError>;

    async fn username_exists(&self, username: &str) -> Result<bool, RepositoryError>;

    async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError>;

    /// Replace the stored hash. Returns `false` when the user is gone.
    async fn update_password(&self, id: &UserId, password_hash: &str)
    -> Result<bool, RepositoryError>;

    /// Grant or revoke staff rights by username. Returns `false` when no
    /// such user exists.
    async fn set_staff(&self, username: &str, is_staff: bool) -> Result<bool, RepositoryError>;

    async fn profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, RepositoryError>;
}
