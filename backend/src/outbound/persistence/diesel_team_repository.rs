//! PostgreSQL-backed team and site settings repositories.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RepositoryError, SiteSettingsRepository, TeamRepository};
use crate::domain::{SiteSettings, TeamMember, TeamMemberId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{SiteSettingsRow, SiteSettingsValues, TeamMemberRow, TeamMemberValues};
use super::pool::DbPool;
use super::schema::{site_settings, team_members};

/// Primary key of the only `site_settings` row.
const SETTINGS_ROW_ID: i16 = 1;

#[derive(Clone)]
pub struct DieselTeamRepository {
    pool: DbPool,
}

impl DieselTeamRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamRepository for DieselTeamRepository {
    async fn list(&self) -> Result<Vec<TeamMember>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TeamMemberRow> = team_members::table
            .select(TeamMemberRow::as_select())
            .order_by(team_members::name)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(TeamMember::from).collect())
    }

    async fn find(&self, id: &TeamMemberId) -> Result<Option<TeamMember>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TeamMemberRow> = team_members::table
            .find(*id.as_uuid())
            .select(TeamMemberRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(TeamMember::from))
    }

    async fn create(&self, member: &TeamMember) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(team_members::table)
            .values((
                team_members::id.eq(*member.id.as_uuid()),
                TeamMemberValues::from(member),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(&self, member: &TeamMember) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(team_members::table.find(*member.id.as_uuid()))
            .set(TeamMemberValues::from(member))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &TeamMemberId) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(team_members::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}

#[derive(Clone)]
pub struct DieselSiteSettingsRepository {
    pool: DbPool,
}

impl DieselSiteSettingsRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SiteSettingsRepository for DieselSiteSettingsRepository {
    async fn load(&self) -> Result<Option<SiteSettings>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<SiteSettingsRow> = site_settings::table
            .find(SETTINGS_ROW_ID)
            .select(SiteSettingsRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(SiteSettings::from))
    }

    async fn save(&self, settings: &SiteSettings) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let values = SiteSettingsValues {
            id: SETTINGS_ROW_ID,
            footer_text: &settings.footer_text,
            theme_color: &settings.theme_color,
        };
        diesel::insert_into(site_settings::table)
            .values(&values)
            .on_conflict(site_settings::id)
            .do_update()
            .set(&values)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
