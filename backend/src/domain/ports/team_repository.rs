//! Port for team members and the site settings singleton.
use async_trait::async_trait;

use crate::domain::{SiteSettings, TeamMember, TeamMemberId};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// All members ordered by name.
    async fn list(&self) -> Result<Vec<TeamMember>, RepositoryError>;

    async fn find(&self, id: &TeamMemberId) -> Result<Option<TeamMember>, RepositoryError>;

    async fn create(&self, member: &TeamMember) -> Result<(), RepositoryError>;

    /// Overwrite every field. Returns `false` when the member is gone.
    async fn update(&self, member: &TeamMember) -> Result<bool, RepositoryError>;

    /// Returns `false` when nothing matched.
    async fn delete(&self, id: &TeamMemberId) -> Result<bool, RepositoryError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SiteSettingsRepository: Send + Sync {
    /// The stored settings, if they were ever saved.
    async fn load(&self) -> Result<Option<SiteSettings>, RepositoryError>;

    /// Create or replace the single settings row.
    async fn save(&self, settings: &SiteSettings) -> Result<(), RepositoryError>;
}
