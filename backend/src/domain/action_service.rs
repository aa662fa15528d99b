//! Categories, eco-actions, uploads and search.

use std::sync::Arc;

use mockable::Clock;
use serde::Serialize;
use tracing::info;

use super::actions::{
    CATEGORY_NAME_TAKEN, CategoryForm, CategoryInput, EcoActionForm, EcoActionInput, SearchQuery,
    SearchResults, UploadForm, UploadInput,
};
use super::forms::{FieldErrors, FormError, INVALID_CHOICE};
use super::ports::{
    ActionRepository, ActivityRepository, BlobArea, BlobStore, CATEGORIES_NAME_KEY,
    CategoryRepository,
};
use super::{
    Category, CategoryId, EcoAction, EcoActionId, Error, SearchLog, SearchLogId, Upload, UploadId,
    UserId,
};

/// Finish a form that names a category, flagging an unknown category
/// alongside any other field errors.
pub(crate) async fn confirm_category<F>(
    categories: &dyn CategoryRepository,
    raw: Option<&str>,
    validated: Result<F, FieldErrors>,
) -> Result<F, FormError> {
    let unknown = match raw.map(str::trim).and_then(|value| value.parse::<CategoryId>().ok()) {
        Some(id) => categories.find(&id).await.map_err(Error::from)?.is_none(),
        None => false,
    };
    match (validated, unknown) {
        (Ok(form), false) => Ok(form),
        (Ok(_), true) => Err(FieldErrors::single("category", INVALID_CHOICE).into()),
        (Err(mut errors), unknown) => {
            if unknown {
                errors.add("category", INVALID_CHOICE);
            }
            Err(errors.into())
        }
    }
}

/// Result of a search request, including any validation message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    /// The trimmed term, empty when no search ran.
    pub query: String,
    #[serde(flatten)]
    pub results: SearchResults,
    pub errors: FieldErrors,
}

#[derive(Clone)]
pub struct ActionService {
    categories: Arc<dyn CategoryRepository>,
    actions: Arc<dyn ActionRepository>,
    activity: Arc<dyn ActivityRepository>,
    blobs: Arc<dyn BlobStore>,
    clock: Arc<dyn Clock>,
}

impl ActionService {
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        actions: Arc<dyn ActionRepository>,
        activity: Arc<dyn ActivityRepository>,
        blobs: Arc<dyn BlobStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            categories,
            actions,
            activity,
            blobs,
            clock,
        }
    }

    pub async fn categories(&self) -> Result<Vec<Category>, Error> {
        Ok(self.categories.list().await?)
    }

    pub async fn create_category(&self, input: &CategoryInput) -> Result<Category, FormError> {
        let form = CategoryForm::validate(input)?;
        let category = Category {
            id: CategoryId::random(),
            name: form.name,
        };
        match self.categories.create(&category).await {
            Ok(()) => {
                info!(category_id = %category.id, name = %category.name, "category created");
                Ok(category)
            }
            Err(err) if err.is_conflict_on(CATEGORIES_NAME_KEY) => {
                Err(FieldErrors::single("name", CATEGORY_NAME_TAKEN).into())
            }
            Err(err) => Err(Error::from(err).into()),
        }
    }

    /// Delete a category; dependent rows keep existing uncategorised.
    pub async fn delete_category(&self, id: &CategoryId) -> Result<(), Error> {
        if self.categories.delete(id).await? {
            info!(category_id = %id, "category deleted");
            Ok(())
        } else {
            Err(Error::not_found("category not found"))
        }
    }

    pub async fn create_action(
        &self,
        user_id: &UserId,
        input: &EcoActionInput,
    ) -> Result<EcoAction, FormError> {
        let validated = EcoActionForm::validate(input);
        let form =
            confirm_category(self.categories.as_ref(), input.category.as_deref(), validated)
                .await?;
        let action = EcoAction {
            id: EcoActionId::random(),
            title: form.title,
            description: form.description,
            category_id: Some(form.category_id),
            user_id: *user_id,
            created_at: self.clock.utc(),
        };
        self.actions
            .create_action(&action)
            .await
            .map_err(Error::from)?;
        info!(action_id = %action.id, user_id = %user_id, "eco action created");
        Ok(action)
    }

    pub async fn actions(&self) -> Result<Vec<EcoAction>, Error> {
        Ok(self.actions.list_actions().await?)
    }

    pub async fn action(&self, id: &EcoActionId) -> Result<EcoAction, Error> {
        self.actions
            .find_action(id)
            .await?
            .ok_or_else(|| Error::not_found("eco action not found"))
    }

    /// Validate, store the file, then record the upload.
    pub async fn create_upload(
        &self,
        user_id: &UserId,
        input: UploadInput,
    ) -> Result<Upload, FormError> {
        let category = input.category.clone();
        let validated = UploadForm::validate(input);
        let form =
            confirm_category(self.categories.as_ref(), category.as_deref(), validated).await?;
        let file_path = self
            .blobs
            .store(BlobArea::Uploads, &form.file.file_name, &form.file.bytes)
            .await
            .map_err(Error::from)?;
        let upload = Upload {
            id: UploadId::random(),
            user_id: *user_id,
            title: form.title,
            description: form.description,
            category_id: Some(form.category_id),
            file_path,
            uploaded_at: self.clock.utc(),
        };
        self.actions
            .create_upload(&upload)
            .await
            .map_err(Error::from)?;
        info!(upload_id = %upload.id, user_id = %user_id, path = %upload.file_path, "file uploaded");
        Ok(upload)
    }

    pub async fn uploads_for(&self, user_id: &UserId) -> Result<Vec<Upload>, Error> {
        Ok(self.actions.uploads_for(user_id).await?)
    }

    /// Search actions and uploads, logging every non-blank valid term.
    pub async fn search(
        &self,
        user_id: Option<UserId>,
        raw: Option<&str>,
    ) -> Result<SearchOutcome, Error> {
        let query = match SearchQuery::parse(raw) {
            Ok(Some(query)) => query,
            Ok(None) => return Ok(SearchOutcome::default()),
            Err(errors) => {
                return Ok(SearchOutcome {
                    errors,
                    ..SearchOutcome::default()
                });
            }
        };
        let results = self.actions.search(query.as_str()).await?;
        let log = SearchLog {
            id: SearchLogId::random(),
            query: query.as_str().to_owned(),
            searched_at: self.clock.utc(),
            user_id,
        };
        self.activity.record_search(&log).await?;
        info!(query = %log.query, matches = results.actions.len() + results.uploads.len(), "search recorded");
        Ok(SearchOutcome {
            query: log.query,
            results,
            errors: FieldErrors::new(),
        })
    }
}
