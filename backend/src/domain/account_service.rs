//! Registration, login and password reset use-cases.
//!
//! Both registration and login record a [`LoginActivity`] row for the
//! current day; the repository keeps that idempotent.
//!
//! [`LoginActivity`]: super::LoginActivity

use std::sync::Arc;

use mockable::Clock;
use tracing::{info, warn};

use super::auth::{
    EMAIL_TAKEN, INVALID_LOGIN, LoginCredentials, LoginInput, NewPassword,
    PasswordResetConfirmInput, PasswordResetRequest, PasswordResetRequestInput, RegistrationForm,
    RegistrationInput, USERNAME_TAKEN,
};
use super::forms::{FieldErrors, FormError};
use super::ports::{
    ActivityRepository, PasswordHasher, USERS_EMAIL_KEY, USERS_USERNAME_KEY, UserRepository,
};
use super::{Error, User, UserId};

/// Account use-cases backed by the user and activity repositories.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    activity: Arc<dyn ActivityRepository>,
    hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        activity: Arc<dyn ActivityRepository>,
        hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            activity,
            hasher,
            clock,
        }
    }

    /// Create an ordinary account and log it in for today.
    pub async fn register(&self, input: &RegistrationInput) -> Result<User, FormError> {
        let form = RegistrationForm::validate(input)?;
        let user = self.create_account(&form, false).await?;
        self.record_login(&user.id).await?;
        info!(user_id = %user.id, "account registered");
        Ok(user)
    }

    /// Create a staff account without logging it in.
    pub async fn create_staff(&self, input: &RegistrationInput) -> Result<User, FormError> {
        let form = RegistrationForm::validate(input)?;
        let user = self.create_account(&form, true).await?;
        info!(user_id = %user.id, "staff account created");
        Ok(user)
    }

    async fn create_account(&self, form: &RegistrationForm, is_staff: bool) -> Result<User, FormError> {
        let mut errors = FieldErrors::new();
        if self.users.username_exists(&form.username).await.map_err(Error::from)? {
            errors.add("username", USERNAME_TAKEN);
        }
        if self.users.email_exists(&form.email).await.map_err(Error::from)? {
            errors.add("email", EMAIL_TAKEN);
        }
        errors.into_result()?;

        let password_hash = self.hasher.hash(form.password.as_str()).map_err(Error::from)?;
        let user = User {
            id: UserId::random(),
            username: form.username.clone(),
            email: form.email.clone(),
            password_hash,
            is_staff,
            date_joined: self.clock.utc(),
        };
        match self.users.create(&user).await {
            Ok(_profile) => Ok(user),
            Err(err) if err.is_conflict_on(USERS_USERNAME_KEY) => {
                Err(FieldErrors::single("username", USERNAME_TAKEN).into())
            }
            Err(err) if err.is_conflict_on(USERS_EMAIL_KEY) => {
                Err(FieldErrors::single("email", EMAIL_TAKEN).into())
            }
            Err(err) => Err(Error::from(err).into()),
        }
    }

    /// Check credentials and record today's login.
    pub async fn login(&self, input: &LoginInput) -> Result<User, FormError> {
        let credentials = LoginCredentials::validate(input)?;
        let user = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(Error::from)?;
        let Some(user) = user else {
            return Err(invalid_login());
        };
        if !self
            .hasher
            .verify(credentials.password(), &user.password_hash)
            .map_err(Error::from)?
        {
            warn!(user_id = %user.id, "rejected login with wrong password");
            return Err(invalid_login());
        }
        self.record_login(&user.id).await?;
        info!(user_id = %user.id, "user logged in");
        Ok(user)
    }

    /// Record a login for today; repeated calls on one day are no-ops.
    pub async fn record_login(&self, user_id: &UserId) -> Result<(), Error> {
        let today = self.clock.utc().date_naive();
        let inserted = self.activity.record_login(user_id, today).await?;
        if inserted {
            info!(user_id = %user_id, %today, "login activity recorded");
        }
        Ok(())
    }

    pub async fn find_user(&self, id: &UserId) -> Result<Option<User>, Error> {
        Ok(self.users.find_by_id(id).await?)
    }

    /// Resolve the account named by username and email.
    ///
    /// `Ok(None)` means the pair did not match any account.
    pub async fn request_password_reset(
        &self,
        input: &PasswordResetRequestInput,
    ) -> Result<Option<UserId>, FormError> {
        let request = PasswordResetRequest::validate(input)?;
        let user = self
            .users
            .find_by_username_and_email(&request.username, &request.email)
            .await
            .map_err(Error::from)?;
        Ok(user.map(|user| user.id))
    }

    /// Replace the password of the account selected by a prior reset
    /// request.
    pub async fn confirm_password_reset(
        &self,
        user_id: &UserId,
        input: &PasswordResetConfirmInput,
    ) -> Result<(), FormError> {
        let password = NewPassword::validate(input)?;
        let hash = self.hasher.hash(password.as_str()).map_err(Error::from)?;
        let updated = self
            .users
            .update_password(user_id, &hash)
            .await
            .map_err(Error::from)?;
        if !updated {
            return Err(Error::not_found("user not found").into());
        }
        info!(user_id = %user_id, "password reset");
        Ok(())
    }

    /// Grant staff rights to an existing account.
    pub async fn promote(&self, username: &str) -> Result<(), Error> {
        if self.users.set_staff(username, true).await? {
            info!(%username, "account promoted to staff");
            Ok(())
        } else {
            Err(Error::not_found(format!("no account named {username}")))
        }
    }
}

fn invalid_login() -> FormError {
    let mut errors = FieldErrors::new();
    errors.add_non_field(INVALID_LOGIN);
    FormError::Invalid(errors)
}

#[cfg(test)]
mod tests {
    //! Account use-cases against mocked ports.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{
        MockActivityRepository, MockPasswordHasher, MockUserRepository, RepositoryError,
    };
    use crate::domain::{UserProfile, UserProfileId};
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use mockable::MockClock;
    use rstest::{fixture, rstest};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 4, 9, 30, 0)
            .single()
            .expect("valid timestamp")
    }

    #[fixture]
    fn clock() -> MockClock {
        let mut clock = MockClock::new();
        clock.expect_utc().return_const(now());
        clock
    }

    fn plain_hasher() -> MockPasswordHasher {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .returning(|pw| Ok(format!("hashed:{pw}")));
        hasher
            .expect_verify()
            .returning(|pw, hash| Ok(hash == format!("hashed:{pw}")));
        hasher
    }

    fn stored_user(username: &str) -> User {
        User {
            id: UserId::random(),
            username: username.to_owned(),
            email: format!("{username}@example.com"),
            password_hash: "hashed:pw".to_owned(),
            is_staff: false,
            date_joined: now(),
        }
    }

    fn service(users: MockUserRepository, activity: MockActivityRepository, clock: MockClock) -> AccountService {
        AccountService::new(
            Arc::new(users),
            Arc::new(activity),
            Arc::new(plain_hasher()),
            Arc::new(clock),
        )
    }

    fn registration(username: &str, email: &str) -> RegistrationInput {
        RegistrationInput {
            username: Some(username.to_owned()),
            email: Some(email.to_owned()),
            password1: Some("pw".to_owned()),
            password2: Some("pw".to_owned()),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn register_creates_user_and_logs_today(clock: MockClock) {
        let mut users = MockUserRepository::new();
        users.expect_username_exists().returning(|_| Ok(false));
        users.expect_email_exists().returning(|_| Ok(false));
        users.expect_create().times(1).returning(|user| {
            Ok(UserProfile {
                id: UserProfileId::random(),
                user_id: user.id,
                bio: String::new(),
            })
        });
        let mut activity = MockActivityRepository::new();
        activity
            .expect_record_login()
            .withf(|_, date| *date == NaiveDate::from_ymd_opt(2025, 5, 4).expect("date"))
            .times(1)
            .returning(|_, _| Ok(true));

        let user = service(users, activity, clock)
            .register(&registration("alice", "alice@example.com"))
            .await
            .expect("registered");
        assert_eq!(user.username, "alice");
        assert_eq!(user.password_hash, "hashed:pw");
        assert!(!user.is_staff);
    }

    #[rstest]
    #[tokio::test]
    async fn staff_accounts_skip_the_login_record(clock: MockClock) {
        let mut users = MockUserRepository::new();
        users.expect_username_exists().returning(|_| Ok(false));
        users.expect_email_exists().returning(|_| Ok(false));
        users
            .expect_create()
            .withf(|user| user.is_staff)
            .times(1)
            .returning(|user| {
                Ok(UserProfile {
                    id: UserProfileId::random(),
                    user_id: user.id,
                    bio: String::new(),
                })
            });
        let mut activity = MockActivityRepository::new();
        activity.expect_record_login().never();

        let user = service(users, activity, clock)
            .create_staff(&registration("admin", "admin@example.com"))
            .await
            .expect("staff created");
        assert!(user.is_staff);
        assert_eq!(user.date_joined, now());
    }

    #[rstest]
    #[tokio::test]
    async fn register_reports_both_duplicates_without_writing(clock: MockClock) {
        let mut users = MockUserRepository::new();
        users.expect_username_exists().returning(|_| Ok(true));
        users.expect_email_exists().returning(|_| Ok(true));
        users.expect_create().never();
        let mut activity = MockActivityRepository::new();
        activity.expect_record_login().never();

        let err = service(users, activity, clock)
            .register(&registration("alice", "alice@example.com"))
            .await
            .expect_err("duplicate");
        let FormError::Invalid(errors) = err else {
            panic!("expected field errors");
        };
        assert_eq!(errors.get("username"), [USERNAME_TAKEN.to_owned()]);
        assert_eq!(errors.get("email"), [EMAIL_TAKEN.to_owned()]);
    }

    #[rstest]
    #[tokio::test]
    async fn register_maps_late_unique_violation_to_field_error(clock: MockClock) {
        let mut users = MockUserRepository::new();
        users.expect_username_exists().returning(|_| Ok(false));
        users.expect_email_exists().returning(|_| Ok(false));
        users
            .expect_create()
            .returning(|_| Err(RepositoryError::conflict(USERS_EMAIL_KEY)));
        let activity = MockActivityRepository::new();

        let err = service(users, activity, clock)
            .register(&registration("bob", "bob@example.com"))
            .await
            .expect_err("race");
        assert!(matches!(err, FormError::Invalid(ref e) if e.has("email")));
    }

    #[rstest]
    #[case("alice", "pw", true)]
    #[case("alice", "wrong", false)]
    #[case("nobody", "pw", false)]
    #[tokio::test]
    async fn login_checks_credentials(
        clock: MockClock,
        #[case] username: &str,
        #[case] password: &str,
        #[case] ok: bool,
    ) {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .returning(|name| Ok((name == "alice").then(|| stored_user("alice"))));
        let mut activity = MockActivityRepository::new();
        activity
            .expect_record_login()
            .times(usize::from(ok))
            .returning(|_, _| Ok(false));

        let input = LoginInput {
            username: Some(username.to_owned()),
            password: Some(password.to_owned()),
            next: None,
        };
        let result = service(users, activity, clock).login(&input).await;
        match (ok, result) {
            (true, Ok(user)) => assert_eq!(user.username, "alice"),
            (false, Err(FormError::Invalid(errors))) => {
                assert_eq!(errors.non_field(), [INVALID_LOGIN.to_owned()]);
            }
            (_, other) => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn reset_confirm_rejects_mismatch_without_touching_storage(clock: MockClock) {
        let mut users = MockUserRepository::new();
        users.expect_update_password().never();
        let input = PasswordResetConfirmInput {
            new_password: Some("one".into()),
            confirm_password: Some("two".into()),
        };
        let err = service(users, MockActivityRepository::new(), clock)
            .confirm_password_reset(&UserId::random(), &input)
            .await
            .expect_err("mismatch");
        assert!(matches!(err, FormError::Invalid(_)));
    }

    #[rstest]
    #[tokio::test]
    async fn reset_confirm_for_vanished_user_is_not_found(clock: MockClock) {
        let mut users = MockUserRepository::new();
        users.expect_update_password().returning(|_, _| Ok(false));
        let input = PasswordResetConfirmInput {
            new_password: Some("new".into()),
            confirm_password: Some("new".into()),
        };
        let err = service(users, MockActivityRepository::new(), clock)
            .confirm_password_reset(&UserId::random(), &input)
            .await
            .expect_err("gone");
        assert!(matches!(err, FormError::Failed(ref e) if e.code() == ErrorCode::NotFound));
    }

    #[rstest]
    #[tokio::test]
    async fn promote_unknown_user_is_not_found(clock: MockClock) {
        let mut users = MockUserRepository::new();
        users.expect_set_staff().returning(|_, _| Ok(false));
        let err = service(users, MockActivityRepository::new(), clock)
            .promote("ghost")
            .await
            .expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
