//! Community event use-cases.

use std::sync::Arc;

use mockable::Clock;
use tracing::info;

use super::events::{EventForm, EventInput};
use super::action_service::confirm_category;
use super::forms::FormError;
use super::ports::{BlobArea, BlobStore, CategoryRepository, EventRepository};
use super::{Error, Event, EventId, UserId};

#[derive(Clone)]
pub struct EventService {
    events: Arc<dyn EventRepository>,
    categories: Arc<dyn CategoryRepository>,
    blobs: Arc<dyn BlobStore>,
    clock: Arc<dyn Clock>,
}

impl EventService {
    pub fn new(
        events: Arc<dyn EventRepository>,
        categories: Arc<dyn CategoryRepository>,
        blobs: Arc<dyn BlobStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            events,
            categories,
            blobs,
            clock,
        }
    }

    pub async fn create(&self, user_id: &UserId, input: EventInput) -> Result<Event, FormError> {
        let category = input.category.clone();
        let validated = EventForm::validate(input);
        let form =
            confirm_category(self.categories.as_ref(), category.as_deref(), validated).await?;
        let image_path = match &form.image {
            Some(image) => Some(
                self.blobs
                    .store(BlobArea::EventImages, &image.file_name, &image.bytes)
                    .await
                    .map_err(Error::from)?,
            ),
            None => None,
        };
        let event = Event {
            id: EventId::random(),
            title: form.title,
            description: form.description,
            category_id: Some(form.category_id),
            user_id: *user_id,
            date: form.date,
            time: form.time,
            location: form.location,
            city: form.city,
            image_path,
            views: 0,
            created_at: self.clock.utc(),
        };
        self.events.create(&event).await.map_err(Error::from)?;
        info!(event_id = %event.id, user_id = %user_id, "event created");
        Ok(event)
    }

    /// Events ordered by date, latest first.
    pub async fn list(&self) -> Result<Vec<Event>, Error> {
        Ok(self.events.list().await?)
    }

    /// Fetch an event for its detail page, counting the view.
    pub async fn view(&self, id: &EventId) -> Result<Event, Error> {
        self.events
            .record_view(id)
            .await?
            .ok_or_else(|| Error::not_found("event not found"))
    }
}
