//! Categories, eco-actions and file uploads, plus the search query.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::forms::{FieldErrors, FileUpload, FormValidator};
use super::{CategoryId, EcoActionId, UploadId, UserId};

pub const CATEGORY_NAME_MAX: usize = 100;
pub const TITLE_MAX: usize = 200;
pub const SEARCH_QUERY_MAX: usize = 255;

pub const CATEGORY_NAME_TAKEN: &str = "Category with this Name already exists.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// A pledged or completed environmental action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EcoAction {
    pub id: EcoActionId,
    pub title: String,
    pub description: String,
    pub category_id: Option<CategoryId>,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// A file shared by a user. `file_path` is relative to the media root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Upload {
    pub id: UploadId,
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub category_id: Option<CategoryId>,
    pub file_path: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct CategoryInput {
    pub name: Option<String>,
}

/// Validated category name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryForm {
    pub name: String,
}

impl CategoryForm {
    pub fn validate(input: &CategoryInput) -> Result<Self, FieldErrors> {
        let mut v = FormValidator::new();
        let name = v.required("name", input.name.as_deref(), Some(CATEGORY_NAME_MAX));
        v.finish()?;
        Ok(Self {
            name: name.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct EcoActionInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcoActionForm {
    pub title: String,
    pub description: String,
    pub category_id: CategoryId,
}

impl EcoActionForm {
    /// Field checks only; the category's existence is confirmed by the
    /// service.
    pub fn validate(input: &EcoActionInput) -> Result<Self, FieldErrors> {
        let mut v = FormValidator::new();
        let title = v.required("title", input.title.as_deref(), Some(TITLE_MAX));
        let description = v.required("description", input.description.as_deref(), None);
        let category_id = v.choice("category", input.category.as_deref());
        let (Some(title), Some(description), Some(category_id)) = (title, description, category_id)
        else {
            return Err(v.into_errors());
        };
        v.finish()?;
        Ok(Self {
            title,
            description,
            category_id,
        })
    }
}

/// Raw upload submission; the file arrives separately from the text fields.
#[derive(Debug, Default, Clone)]
pub struct UploadInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub file: Option<FileUpload>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadForm {
    pub title: String,
    pub description: String,
    pub category_id: CategoryId,
    pub file: FileUpload,
}

impl UploadForm {
    pub fn validate(input: UploadInput) -> Result<Self, FieldErrors> {
        let mut v = FormValidator::new();
        let title = v.required("title", input.title.as_deref(), Some(TITLE_MAX));
        let description = v.required("description", input.description.as_deref(), None);
        let category_id = v.choice("category", input.category.as_deref());
        let file = v.required_file("file", input.file);
        let (Some(title), Some(description), Some(category_id), Some(file)) =
            (title, description, category_id, file)
        else {
            return Err(v.into_errors());
        };
        v.finish()?;
        Ok(Self {
            title,
            description,
            category_id,
            file,
        })
    }
}

/// A validated search term.
///
/// The term is trimmed and must hold between 1 and 255 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// `Ok(None)` for an absent or blank query; errors only on over-long input.
    pub fn parse(raw: Option<&str>) -> Result<Option<Self>, FieldErrors> {
        let term = raw.map(str::trim).unwrap_or_default();
        if term.is_empty() {
            return Ok(None);
        }
        let mut v = FormValidator::new();
        let term = v.optional("query", Some(term), Some(SEARCH_QUERY_MAX));
        v.finish()?;
        Ok(Some(Self(term)))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Matches for a search term across actions and uploads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub actions: Vec<EcoAction>,
    pub uploads: Vec<Upload>,
}
