//! Port for feedback and contact messages.
use async_trait::async_trait;

use crate::domain::{ContactMessage, Feedback};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EngagementRepository: Send + Sync {
    async fn create_feedback(&self, feedback: &Feedback) -> Result<(), RepositoryError>;

    /// Newest first.
    async fn list_feedback(&self) -> Result<Vec<Feedback>, RepositoryError>;

    async fn create_contact(&self, message: &ContactMessage) -> Result<(), RepositoryError>;

    /// Newest first.
    async fn list_contacts(&self) -> Result<Vec<ContactMessage>, RepositoryError>;
}
