//! PostgreSQL-backed `EngagementRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{EngagementRepository, RepositoryError};
use crate::domain::{ContactMessage, Feedback};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{ContactMessageRow, FeedbackRow, NewContactMessageRow, NewFeedbackRow};
use super::pool::DbPool;
use super::schema::{contact_messages, feedback};

#[derive(Clone)]
pub struct DieselEngagementRepository {
    pool: DbPool,
}

impl DieselEngagementRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EngagementRepository for DieselEngagementRepository {
    async fn create_feedback(&self, entry: &Feedback) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(feedback::table)
            .values(&NewFeedbackRow::from(entry))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_feedback(&self) -> Result<Vec<Feedback>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<FeedbackRow> = feedback::table
            .select(FeedbackRow::as_select())
            .order_by(feedback::submitted_at.desc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Feedback::from).collect())
    }

    async fn create_contact(&self, message: &ContactMessage) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(contact_messages::table)
            .values(&NewContactMessageRow::from(message))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_contacts(&self) -> Result<Vec<ContactMessage>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ContactMessageRow> = contact_messages::table
            .select(ContactMessageRow::as_select())
            .order_by(contact_messages::sent_at.desc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(ContactMessage::from).collect())
    }
}
