//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations translate between Diesel rows and domain
//! entities and nothing else. Row structs (`models.rs`) and table
//! definitions (`schema.rs`) stay private to this module. Connections come
//! from a shared `bb8` pool through `diesel-async`.
//!
//! ```ignore
//! use ecoactions::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/ecoactions")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_action_repository;
mod diesel_activity_repository;
mod diesel_category_repository;
mod diesel_engagement_repository;
mod diesel_error_mapping;
mod diesel_event_repository;
mod diesel_team_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_action_repository::DieselActionRepository;
pub use diesel_activity_repository::DieselActivityRepository;
pub use diesel_category_repository::DieselCategoryRepository;
pub use diesel_engagement_repository::DieselEngagementRepository;
pub use diesel_event_repository::DieselEventRepository;
pub use diesel_team_repository::{DieselSiteSettingsRepository, DieselTeamRepository};
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
