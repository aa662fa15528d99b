//! Community events and their creation form.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use super::actions::TITLE_MAX;
use super::forms::{FieldErrors, FileUpload, FormValidator};
use super::{CategoryId, EventId, UserId};

pub const LOCATION_MAX: usize = 255;
pub const CITY_MAX: usize = 100;

/// A scheduled gathering. `views` counts detail page reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub category_id: Option<CategoryId>,
    pub user_id: UserId,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
    pub city: String,
    pub image_path: Option<String>,
    pub views: i32,
    pub created_at: DateTime<Utc>,
}

/// Raw event submission as read from a multipart body.
#[derive(Debug, Default, Clone)]
pub struct EventInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub city: Option<String>,
    pub image: Option<FileUpload>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventForm {
    pub title: String,
    pub description: String,
    pub category_id: CategoryId,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
    pub city: String,
    pub image: Option<FileUpload>,
}

impl EventForm {
    pub fn validate(input: EventInput) -> Result<Self, FieldErrors> {
        let mut v = FormValidator::new();
        let title = v.required("title", input.title.as_deref(), Some(TITLE_MAX));
        let description = v.required("description", input.description.as_deref(), None);
        let category_id = v.choice("category", input.category.as_deref());
        let date = v.date("date", input.date.as_deref());
        let time = v.time("time", input.time.as_deref());
        let location = v.required("location", input.location.as_deref(), Some(LOCATION_MAX));
        let city = v.required("city", input.city.as_deref(), Some(CITY_MAX));
        let image = v.optional_image("image", input.image);

        let (
            Some(title),
            Some(description),
            Some(category_id),
            Some(date),
            Some(time),
            Some(location),
            Some(city),
        ) = (title, description, category_id, date, time, location, city)
        else {
            return Err(v.into_errors());
        };
        v.finish()?;
        Ok(Self {
            title,
            description,
            category_id,
            date,
            time,
            location,
            city,
            image,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::forms::{INVALID_DATE, INVALID_IMAGE};
    use rstest::{fixture, rstest};

    #[fixture]
    fn input() -> EventInput {
        EventInput {
            title: Some("Beach clean-up".into()),
            description: Some("Bring gloves".into()),
            category: Some(CategoryId::random().to_string()),
            date: Some("2025-07-12".into()),
            time: Some("10:00".into()),
            location: Some("North pier".into()),
            city: Some("Brighton".into()),
            image: None,
        }
    }

    #[rstest]
    fn accepts_event_without_image(input: EventInput) {
        let form = EventForm::validate(input).expect("valid");
        assert_eq!(form.time, NaiveTime::from_hms_opt(10, 0, 0).expect("time"));
        assert!(form.image.is_none());
    }

    #[rstest]
    fn reports_every_bad_field(mut input: EventInput) {
        input.date = Some("12/07/2025".into());
        input.image = Some(FileUpload::new("notes.txt", None, b"hi".to_vec()));
        let errors = EventForm::validate(input).expect_err("invalid");
        assert_eq!(errors.get("date"), [INVALID_DATE.to_owned()]);
        assert_eq!(errors.get("image"), [INVALID_IMAGE.to_owned()]);
    }
}
