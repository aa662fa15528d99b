//! Port for eco-actions and uploads, including the text search over both.
use async_trait::async_trait;

use crate::domain::{EcoAction, EcoActionId, SearchResults, Upload, UserId};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActionRepository: Send + Sync {
    async fn create_action(&self, action: &EcoAction) -> Result<(), RepositoryError>;

    /// Every action, newest first.
    async fn list_actions(&self) -> Result<Vec<EcoAction>, RepositoryError>;

    async fn find_action(&self, id: &EcoActionId) -> Result<Option<EcoAction>, RepositoryError>;

    async fn create_upload(&self, upload: &Upload) -> Result<(), RepositoryError>;

    /// The user's uploads, newest first.
    async fn uploads_for(&self, user_id: &UserId) -> Result<Vec<Upload>, RepositoryError>;

    /// Case-insensitive substring match on title or description.
    async fn search(&self, term: &str) -> Result<SearchResults, RepositoryError>;
}
