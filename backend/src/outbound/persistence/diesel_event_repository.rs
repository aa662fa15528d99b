//! PostgreSQL-backed `EventRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{EventRepository, RepositoryError};
use crate::domain::{Event, EventId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{EventRow, NewEventRow};
use super::pool::DbPool;
use super::schema::events;

#[derive(Clone)]
pub struct DieselEventRepository {
    pool: DbPool,
}

impl DieselEventRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for DieselEventRepository {
    async fn create(&self, event: &Event) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(events::table)
            .values(&NewEventRow::from(event))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list(&self) -> Result<Vec<Event>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<EventRow> = events::table
            .select(EventRow::as_select())
            .order_by((events::date.desc(), events::time.desc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn record_view(&self, id: &EventId) -> Result<Option<Event>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<EventRow> = diesel::update(events::table.find(*id.as_uuid()))
            .set(events::views.eq(events::views + 1))
            .returning(EventRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Event::from))
    }
}
