//! Port for community events.
use async_trait::async_trait;

use crate::domain::{Event, EventId};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event) -> Result<(), RepositoryError>;

    /// Every event, latest date first.
    async fn list(&self) -> Result<Vec<Event>, RepositoryError>;

    /// Atomically increment the view counter and return the updated event,
    /// or `None` when it does not exist.
    async fn record_view(&self, id: &EventId) -> Result<Option<Event>, RepositoryError>;
}
