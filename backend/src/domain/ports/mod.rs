//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod action_repository;
mod activity_repository;
mod blob_store;
mod category_repository;
mod engagement_repository;
mod event_repository;
mod password_hasher;
mod repository_error;
mod team_repository;
mod user_repository;

#[cfg(test)]
pub use action_repository::MockActionRepository;
pub use action_repository::ActionRepository;
#[cfg(test)]
pub use activity_repository::MockActivityRepository;
pub use activity_repository::ActivityRepository;
#[cfg(test)]
pub use blob_store::MockBlobStore;
pub use blob_store::{BlobArea, BlobStore, BlobStoreError};
#[cfg(test)]
pub use category_repository::MockCategoryRepository;
pub use category_repository::CategoryRepository;
#[cfg(test)]
pub use engagement_repository::MockEngagementRepository;
pub use engagement_repository::EngagementRepository;
#[cfg(test)]
pub use event_repository::MockEventRepository;
pub use event_repository::EventRepository;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
pub use repository_error::{
    CATEGORIES_NAME_KEY, RepositoryError, USERS_EMAIL_KEY, USERS_USERNAME_KEY,
};
#[cfg(test)]
pub use team_repository::{MockSiteSettingsRepository, MockTeamRepository};
pub use team_repository::{SiteSettingsRepository, TeamRepository};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::UserRepository;
