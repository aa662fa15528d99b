//! Port for the category reference data.
use async_trait::async_trait;

use crate::domain::{Category, CategoryId};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// All categories ordered by name.
    async fn list(&self) -> Result<Vec<Category>, RepositoryError>;

    async fn find(&self, id: &CategoryId) -> Result<Option<Category>, RepositoryError>;

    /// Insert a category; a duplicate name is a conflict.
    async fn create(&self, category: &Category) -> Result<(), RepositoryError>;

    /// Delete a category, nulling references from actions, uploads and
    /// events. Returns `false` when nothing matched.
    async fn delete(&self, id: &CategoryId) -> Result<bool, RepositoryError>;
}
