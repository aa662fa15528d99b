//! Team page members and the site-wide settings singleton.

use serde::{Deserialize, Serialize};

use super::forms::{FieldErrors, FileUpload, FormValidator};
use super::TeamMemberId;

pub const NAME_MAX: usize = 100;
pub const ROLE_MAX: usize = 100;
pub const THEME_COLOR_MAX: usize = 7;

pub const DEFAULT_FOOTER_TEXT: &str = "© 2025 GreenWorld. All rights reserved.";
pub const DEFAULT_THEME_COLOR: &str = "#28a745";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamMember {
    pub id: TeamMemberId,
    pub name: String,
    pub role: String,
    pub bio: String,
    pub photo_path: Option<String>,
}

/// Raw team member submission.
#[derive(Debug, Default, Clone)]
pub struct TeamMemberInput {
    pub name: Option<String>,
    pub role: Option<String>,
    pub bio: Option<String>,
    pub photo: Option<FileUpload>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamMemberForm {
    pub name: String,
    pub role: String,
    pub bio: String,
    /// A replacement photo; `None` keeps whatever is stored.
    pub photo: Option<FileUpload>,
}

impl TeamMemberForm {
    pub fn validate(input: TeamMemberInput) -> Result<Self, FieldErrors> {
        let mut v = FormValidator::new();
        let name = v.required("name", input.name.as_deref(), Some(NAME_MAX));
        let role = v.required("role", input.role.as_deref(), Some(ROLE_MAX));
        let bio = v.optional("bio", input.bio.as_deref(), None);
        let photo = v.optional_image("photo", input.photo);
        let (Some(name), Some(role)) = (name, role) else {
            return Err(v.into_errors());
        };
        v.finish()?;
        Ok(Self {
            name,
            role,
            bio,
            photo,
        })
    }
}

/// Footer text and theme colour shared by every page.
///
/// There is at most one stored row; readers fall back to [`Default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSettings {
    pub footer_text: String,
    pub theme_color: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            footer_text: DEFAULT_FOOTER_TEXT.to_owned(),
            theme_color: DEFAULT_THEME_COLOR.to_owned(),
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct SiteSettingsInput {
    pub footer_text: Option<String>,
    pub theme_color: Option<String>,
}

impl SiteSettings {
    pub fn validate(input: &SiteSettingsInput) -> Result<Self, FieldErrors> {
        let mut v = FormValidator::new();
        let footer_text = v.required("footer_text", input.footer_text.as_deref(), None);
        let theme_color = v.required(
            "theme_color",
            input.theme_color.as_deref(),
            Some(THEME_COLOR_MAX),
        );
        let (Some(footer_text), Some(theme_color)) = (footer_text, theme_color) else {
            return Err(v.into_errors());
        };
        v.finish()?;
        Ok(Self {
            footer_text,
            theme_color,
        })
    }
}
