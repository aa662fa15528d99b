//! Feedback and contact message use-cases.

use std::sync::Arc;

use mockable::Clock;
use tracing::info;

use super::engagement::{ContactForm, ContactInput, FeedbackForm, FeedbackInput};
use super::forms::FormError;
use super::ports::EngagementRepository;
use super::{ContactMessage, ContactMessageId, Error, Feedback, FeedbackId, UserId};

#[derive(Clone)]
pub struct EngagementService {
    repo: Arc<dyn EngagementRepository>,
    clock: Arc<dyn Clock>,
}

impl EngagementService {
    pub fn new(repo: Arc<dyn EngagementRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    pub async fn submit_feedback(
        &self,
        user_id: &UserId,
        input: &FeedbackInput,
    ) -> Result<Feedback, FormError> {
        let form = FeedbackForm::validate(input)?;
        let feedback = Feedback {
            id: FeedbackId::random(),
            user_id: *user_id,
            comment: form.comment,
            submitted_at: self.clock.utc(),
        };
        self.repo
            .create_feedback(&feedback)
            .await
            .map_err(Error::from)?;
        info!(feedback_id = %feedback.id, user_id = %user_id, "feedback submitted");
        Ok(feedback)
    }

    pub async fn send_contact(&self, input: &ContactInput) -> Result<ContactMessage, FormError> {
        let form = ContactForm::validate(input)?;
        let message = ContactMessage {
            id: ContactMessageId::random(),
            name: form.name,
            email: form.email,
            subject: form.subject,
            message: form.message,
            sent_at: self.clock.utc(),
        };
        self.repo
            .create_contact(&message)
            .await
            .map_err(Error::from)?;
        info!(message_id = %message.id, "contact message received");
        Ok(message)
    }

    pub async fn feedback(&self) -> Result<Vec<Feedback>, Error> {
        Ok(self.repo.list_feedback().await?)
    }

    pub async fn contact_messages(&self) -> Result<Vec<ContactMessage>, Error> {
        Ok(self.repo.list_contacts().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockEngagementRepository, RepositoryError};
    use chrono::Utc;
    use mockable::MockClock;
    use rstest::rstest;

    fn service(repo: MockEngagementRepository) -> EngagementService {
        let mut clock = MockClock::new();
        clock.expect_utc().returning(Utc::now);
        EngagementService::new(Arc::new(repo), Arc::new(clock))
    }

    #[rstest]
    #[tokio::test]
    async fn invalid_contact_is_not_stored() {
        let mut repo = MockEngagementRepository::new();
        repo.expect_create_contact().never();
        let err = service(repo)
            .send_contact(&ContactInput::default())
            .await
            .expect_err("empty form");
        assert!(matches!(err, FormError::Invalid(_)));
    }

    #[rstest]
    #[tokio::test]
    async fn feedback_is_attributed_to_author() {
        let user = UserId::random();
        let mut repo = MockEngagementRepository::new();
        repo.expect_create_feedback()
            .withf(move |fb| fb.user_id == user && fb.comment == "Nice")
            .times(1)
            .returning(|_| Ok(()));
        service(repo)
            .submit_feedback(&user, &FeedbackInput { comment: Some("Nice".into()) })
            .await
            .expect("stored");
    }

    #[rstest]
    #[tokio::test]
    async fn storage_outage_surfaces_as_unavailable() {
        let mut repo = MockEngagementRepository::new();
        repo.expect_list_feedback()
            .returning(|| Err(RepositoryError::connection("pool timed out")));
        let err = service(repo).feedback().await.expect_err("outage");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
