//! Visit capture and the per-user history summary.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::Serialize;
use tracing::debug;

use super::ports::{ActivityRepository, UserRepository};
use super::{Error, SearchLog, UserHistory, UserId, Visit, VisitDetails, VisitId};

/// Row limit for the admin activity listings.
pub const ADMIN_LISTING_LIMIT: i64 = 200;

/// Server-side view of a user's activity for the history page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistorySummary {
    pub total_logins: usize,
    /// Most recent first.
    pub login_dates: Vec<NaiveDate>,
    /// Today's history row after this visit was counted.
    pub today: UserHistory,
    pub bio: String,
    /// Clock reading taken for this summary.
    pub checked_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct ActivityService {
    activity: Arc<dyn ActivityRepository>,
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl ActivityService {
    pub fn new(
        activity: Arc<dyn ActivityRepository>,
        users: Arc<dyn UserRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            activity,
            users,
            clock,
        }
    }

    /// Persist one visit row; every call writes a new row.
    pub async fn record_visit(&self, details: VisitDetails) -> Result<Visit, Error> {
        let visit = Visit {
            id: VisitId::random(),
            user_id: Some(details.user_id),
            ip_address: details.ip_address,
            user_agent: details.user_agent,
            visit_time: self.clock.utc(),
        };
        self.activity.record_visit(&visit).await?;
        debug!(user_id = %details.user_id, ip = %visit.ip_address, "visit recorded");
        Ok(visit)
    }

    /// Count today's visit and gather the login history.
    pub async fn history(&self, user_id: &UserId) -> Result<HistorySummary, Error> {
        let now = self.clock.utc();
        let today = now.date_naive();
        let login_dates = self.activity.login_dates(user_id).await?;
        let today = self.activity.bump_history(user_id, today).await?;
        let bio = self
            .users
            .profile(user_id)
            .await?
            .map(|profile| profile.bio)
            .unwrap_or_default();
        Ok(HistorySummary {
            total_logins: login_dates.len(),
            login_dates,
            today,
            bio,
            checked_at: now,
        })
    }

    pub async fn recent_visits(&self) -> Result<Vec<Visit>, Error> {
        Ok(self.activity.recent_visits(ADMIN_LISTING_LIMIT).await?)
    }

    pub async fn recent_searches(&self) -> Result<Vec<SearchLog>, Error> {
        Ok(self.activity.recent_searches(ADMIN_LISTING_LIMIT).await?)
    }
}
