//! Team page management and site settings.

use std::sync::Arc;

use tracing::info;

use super::forms::FormError;
use super::ports::{BlobArea, BlobStore, SiteSettingsRepository, TeamRepository};
use super::team::{SiteSettingsInput, TeamMemberForm, TeamMemberInput};
use super::{Error, SiteSettings, TeamMember, TeamMemberId};

#[derive(Clone)]
pub struct TeamService {
    team: Arc<dyn TeamRepository>,
    settings: Arc<dyn SiteSettingsRepository>,
    blobs: Arc<dyn BlobStore>,
}

impl TeamService {
    pub fn new(
        team: Arc<dyn TeamRepository>,
        settings: Arc<dyn SiteSettingsRepository>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            team,
            settings,
            blobs,
        }
    }

    /// Members ordered by name.
    pub async fn members(&self) -> Result<Vec<TeamMember>, Error> {
        Ok(self.team.list().await?)
    }

    pub async fn member(&self, id: &TeamMemberId) -> Result<TeamMember, Error> {
        self.team
            .find(id)
            .await?
            .ok_or_else(|| Error::not_found("team member not found"))
    }

    async fn store_photo(&self, form: &TeamMemberForm) -> Result<Option<String>, Error> {
        match &form.photo {
            Some(photo) => Ok(Some(
                self.blobs
                    .store(BlobArea::TeamPhotos, &photo.file_name, &photo.bytes)
                    .await?,
            )),
            None => Ok(None),
        }
    }

    pub async fn add(&self, input: TeamMemberInput) -> Result<TeamMember, FormError> {
        let form = TeamMemberForm::validate(input)?;
        let photo_path = self.store_photo(&form).await?;
        let member = TeamMember {
            id: TeamMemberId::random(),
            name: form.name,
            role: form.role,
            bio: form.bio,
            photo_path,
        };
        self.team.create(&member).await.map_err(Error::from)?;
        info!(member_id = %member.id, "team member added");
        Ok(member)
    }

    /// Update a member; without a new photo the stored one is kept.
    pub async fn edit(
        &self,
        id: &TeamMemberId,
        input: TeamMemberInput,
    ) -> Result<TeamMember, FormError> {
        let existing = self.member(id).await?;
        let form = TeamMemberForm::validate(input)?;
        let photo_path = self.store_photo(&form).await?.or(existing.photo_path);
        let member = TeamMember {
            id: existing.id,
            name: form.name,
            role: form.role,
            bio: form.bio,
            photo_path,
        };
        if !self.team.update(&member).await.map_err(Error::from)? {
            return Err(Error::not_found("team member not found").into());
        }
        info!(member_id = %member.id, "team member updated");
        Ok(member)
    }

    pub async fn remove(&self, id: &TeamMemberId) -> Result<(), Error> {
        if self.team.delete(id).await? {
            info!(member_id = %id, "team member deleted");
            Ok(())
        } else {
            Err(Error::not_found("team member not found"))
        }
    }

    /// Stored settings, or the defaults when none were saved yet.
    pub async fn site_settings(&self) -> Result<SiteSettings, Error> {
        Ok(self.settings.load().await?.unwrap_or_default())
    }

    pub async fn update_site_settings(
        &self,
        input: &SiteSettingsInput,
    ) -> Result<SiteSettings, FormError> {
        let settings = SiteSettings::validate(input)?;
        self.settings.save(&settings).await.map_err(Error::from)?;
        info!(theme_color = %settings.theme_color, "site settings updated");
        Ok(settings)
    }
}
