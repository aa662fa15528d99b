//! Port for login activity, per-day history, visits and search logs.
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{SearchLog, UserHistory, UserId, Visit};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// Record a login for `(user_id, date)`.
    ///
    /// Idempotent: returns `true` only when a new row was written.
    async fn record_login(&self, user_id: &UserId, date: NaiveDate)
    -> Result<bool, RepositoryError>;

    /// Dates on which the user logged in, most recent first.
    async fn login_dates(&self, user_id: &UserId) -> Result<Vec<NaiveDate>, RepositoryError>;

    /// Create the `(user_id, date)` history row with a count of one, or
    /// increment the existing count.
    async fn bump_history(
        &self,
        user_id: &UserId,
        date: NaiveDate,
    ) -> Result<UserHistory, RepositoryError>;

    async fn record_visit(&self, visit: &Visit) -> Result<(), RepositoryError>;

    async fn record_search(&self, log: &SearchLog) -> Result<(), RepositoryError>;

    /// Newest visits first, at most `limit` rows.
    async fn recent_visits(&self, limit: i64) -> Result<Vec<Visit>, RepositoryError>;

    /// Newest searches first, at most `limit` rows.
    async fn recent_searches(&self, limit: i64) -> Result<Vec<SearchLog>, RepositoryError>;
}
