//! PostgreSQL-backed `ActivityRepository`.
//!
//! Login dedup and the per-day history counter lean on unique constraints
//! so concurrent requests cannot double count.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ActivityRepository, RepositoryError};
use crate::domain::{
    LoginActivityId, SearchLog, UserHistory, UserHistoryId, UserId, Visit,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{
    NewLoginActivityRow, NewSearchLogRow, NewVisitRow, SearchLogRow, UserHistoryRow, VisitRow,
};
use super::pool::DbPool;
use super::schema::{login_activities, search_logs, user_history, visits};

#[derive(Clone)]
pub struct DieselActivityRepository {
    pool: DbPool,
}

impl DieselActivityRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityRepository for DieselActivityRepository {
    async fn record_login(
        &self,
        user_id: &UserId,
        date: NaiveDate,
    ) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewLoginActivityRow {
            id: *LoginActivityId::random().as_uuid(),
            user_id: *user_id.as_uuid(),
            login_date: date,
        };
        let inserted = diesel::insert_into(login_activities::table)
            .values(&row)
            .on_conflict((login_activities::user_id, login_activities::login_date))
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(inserted > 0)
    }

    async fn login_dates(&self, user_id: &UserId) -> Result<Vec<NaiveDate>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        login_activities::table
            .filter(login_activities::user_id.eq(*user_id.as_uuid()))
            .select(login_activities::login_date)
            .order_by(login_activities::login_date.desc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn bump_history(
        &self,
        user_id: &UserId,
        date: NaiveDate,
    ) -> Result<UserHistory, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = UserHistoryRow {
            id: *UserHistoryId::random().as_uuid(),
            user_id: *user_id.as_uuid(),
            visit_date: date,
            visit_count: 1,
        };
        let stored: UserHistoryRow = diesel::insert_into(user_history::table)
            .values(&row)
            .on_conflict((user_history::user_id, user_history::visit_date))
            .do_update()
            .set(user_history::visit_count.eq(user_history::visit_count + 1))
            .returning(UserHistoryRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(stored.into())
    }

    async fn record_visit(&self, visit: &Visit) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(visits::table)
            .values(&NewVisitRow::from(visit))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn record_search(&self, log: &SearchLog) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(search_logs::table)
            .values(&NewSearchLogRow::from(log))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn recent_visits(&self, limit: i64) -> Result<Vec<Visit>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<VisitRow> = visits::table
            .select(VisitRow::as_select())
            .order_by(visits::visit_time.desc())
            .limit(limit)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Visit::from).collect())
    }

    async fn recent_searches(&self, limit: i64) -> Result<Vec<SearchLog>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<SearchLogRow> = search_logs::table
            .select(SearchLogRow::as_select())
            .order_by(search_logs::searched_at.desc())
            .limit(limit)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(SearchLog::from).collect())
    }
}
