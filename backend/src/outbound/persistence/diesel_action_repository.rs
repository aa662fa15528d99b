//! PostgreSQL-backed `ActionRepository`, including the `ILIKE` search.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ActionRepository, RepositoryError};
use crate::domain::{EcoAction, EcoActionId, SearchResults, Upload, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{EcoActionRow, NewEcoActionRow, NewUploadRow, UploadRow};
use super::pool::DbPool;
use super::schema::{eco_actions, uploads};

#[derive(Clone)]
pub struct DieselActionRepository {
    pool: DbPool,
}

impl DieselActionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Build a `%term%` pattern with `LIKE` metacharacters escaped so user
/// input only ever matches literally.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl ActionRepository for DieselActionRepository {
    async fn create_action(&self, action: &EcoAction) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(eco_actions::table)
            .values(&NewEcoActionRow::from(action))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_actions(&self) -> Result<Vec<EcoAction>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<EcoActionRow> = eco_actions::table
            .select(EcoActionRow::as_select())
            .order_by(eco_actions::created_at.desc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(EcoAction::from).collect())
    }

    async fn find_action(&self, id: &EcoActionId) -> Result<Option<EcoAction>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<EcoActionRow> = eco_actions::table
            .find(*id.as_uuid())
            .select(EcoActionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(EcoAction::from))
    }

    async fn create_upload(&self, upload: &Upload) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(uploads::table)
            .values(&NewUploadRow::from(upload))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn uploads_for(&self, user_id: &UserId) -> Result<Vec<Upload>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UploadRow> = uploads::table
            .filter(uploads::user_id.eq(*user_id.as_uuid()))
            .select(UploadRow::as_select())
            .order_by(uploads::uploaded_at.desc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Upload::from).collect())
    }

    async fn search(&self, term: &str) -> Result<SearchResults, RepositoryError> {
        let pattern = contains_pattern(term);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let action_rows: Vec<EcoActionRow> = eco_actions::table
            .filter(
                eco_actions::title
                    .ilike(pattern.as_str())
                    .or(eco_actions::description.ilike(pattern.as_str())),
            )
            .select(EcoActionRow::as_select())
            .order_by(eco_actions::created_at.desc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let upload_rows: Vec<UploadRow> = uploads::table
            .filter(
                uploads::title
                    .ilike(pattern.as_str())
                    .or(uploads::description.ilike(pattern.as_str())),
            )
            .select(UploadRow::as_select())
            .order_by(uploads::uploaded_at.desc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(SearchResults {
            actions: action_rows.into_iter().map(EcoAction::from).collect(),
            uploads: upload_rows.into_iter().map(Upload::from).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("paper", "%paper%")]
    #[case("50%", "%50\\%%")]
    #[case("a_b", "%a\\_b%")]
    #[case("c:\\", "%c:\\\\%")]
    fn escapes_like_metacharacters(#[case] term: &str, #[case] expected: &str) {
        assert_eq!(contains_pattern(term), expected);
    }
}
