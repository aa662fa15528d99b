//! Feedback from members and contact messages from anyone.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::forms::{FieldErrors, FormValidator};
use super::{ContactMessageId, FeedbackId, UserId};

pub const CONTACT_NAME_MAX: usize = 100;
pub const SUBJECT_MAX: usize = 150;

pub const CONTACT_THANKS: &str = "Thank you for your message! We will get back to you soon.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feedback {
    pub id: FeedbackId,
    pub user_id: UserId,
    pub comment: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct FeedbackInput {
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackForm {
    pub comment: String,
}

impl FeedbackForm {
    pub fn validate(input: &FeedbackInput) -> Result<Self, FieldErrors> {
        let mut v = FormValidator::new();
        let comment = v.required("comment", input.comment.as_deref(), None);
        let Some(comment) = comment else {
            return Err(v.into_errors());
        };
        Ok(Self { comment })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    pub id: ContactMessageId,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ContactInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    pub fn validate(input: &ContactInput) -> Result<Self, FieldErrors> {
        let mut v = FormValidator::new();
        let name = v.required("name", input.name.as_deref(), Some(CONTACT_NAME_MAX));
        let email = v.email("email", input.email.as_deref());
        let subject = v.required("subject", input.subject.as_deref(), Some(SUBJECT_MAX));
        let message = v.required("message", input.message.as_deref(), None);
        let (Some(name), Some(email), Some(subject), Some(message)) =
            (name, email, subject, message)
        else {
            return Err(v.into_errors());
        };
        v.finish()?;
        Ok(Self {
            name,
            email,
            subject,
            message,
        })
    }
}
