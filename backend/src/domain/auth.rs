//! Authentication forms: registration, login and the two-step password reset.
//!
//! Usernames and emails are trimmed; passwords keep caller-provided
//! whitespace and are wrapped in [`Zeroizing`] so they are wiped on drop.

use serde::Deserialize;
use zeroize::Zeroizing;

use super::forms::{FieldErrors, FormValidator};
use super::user::{INVALID_USERNAME, USERNAME_MAX, is_valid_username};

pub const PASSWORD_MISMATCH: &str = "The two password fields didn't match.";
pub const RESET_PASSWORD_MISMATCH: &str = "Passwords do not match.";
pub const USERNAME_TAKEN: &str = "This username is already taken.";
pub const EMAIL_TAKEN: &str = "This email is already in use.";
pub const INVALID_LOGIN: &str = "Please enter a correct username and password. Note that both fields may be case-sensitive.";
pub const RESET_NO_MATCH: &str =
    "Username and email do not match. Try again or create a new account.";

/// Raw registration submission.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RegistrationInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password1: Option<String>,
    pub password2: Option<String>,
}

/// Registration that passed field checks; uniqueness is checked by the
/// account service against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: Zeroizing<String>,
}

impl RegistrationForm {
    pub fn validate(input: &RegistrationInput) -> Result<Self, FieldErrors> {
        let mut v = FormValidator::new();
        let username = v.required("username", input.username.as_deref(), Some(USERNAME_MAX));
        if let Some(name) = username.as_deref()
            && !is_valid_username(name)
        {
            v.reject("username", INVALID_USERNAME);
        }
        let email = v.email("email", input.email.as_deref());
        let password1 = v.secret("password1", input.password1.as_deref());
        let password2 = v.secret("password2", input.password2.as_deref());
        if let (Some(first), Some(second)) = (&password1, &password2)
            && first != second
        {
            v.reject("password2", PASSWORD_MISMATCH);
        }
        v.finish()?;

        Ok(Self {
            username: username.unwrap_or_default(),
            email: email.unwrap_or_default(),
            password: Zeroizing::new(password1.unwrap_or_default()),
        })
    }
}

/// Raw login submission, including the optional post-login redirect.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct LoginInput {
    pub username: Option<String>,
    pub password: Option<String>,
    pub next: Option<String>,
}

/// Validated login credentials used by the account service.
///
/// # Examples
/// ```
/// use ecoactions::domain::auth::{LoginCredentials, LoginInput};
///
/// let input = LoginInput {
///     username: Some(" admin ".into()),
///     password: Some("password".into()),
///     next: None,
/// };
/// let creds = LoginCredentials::validate(&input).unwrap();
/// assert_eq!(creds.username(), "admin");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    pub fn validate(input: &LoginInput) -> Result<Self, FieldErrors> {
        let mut v = FormValidator::new();
        let username = v.required("username", input.username.as_deref(), Some(USERNAME_MAX));
        let password = v.secret("password", input.password.as_deref());
        v.finish()?;
        Ok(Self {
            username: username.unwrap_or_default(),
            password: Zeroizing::new(password.unwrap_or_default()),
        })
    }

    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct PasswordResetRequestInput {
    pub username: Option<String>,
    pub email: Option<String>,
}

/// Identifies the account whose password is about to be replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordResetRequest {
    pub username: String,
    pub email: String,
}

impl PasswordResetRequest {
    pub fn validate(input: &PasswordResetRequestInput) -> Result<Self, FieldErrors> {
        let mut v = FormValidator::new();
        let username = v.required("username", input.username.as_deref(), None);
        let email = v.email("email", input.email.as_deref());
        v.finish()?;
        Ok(Self {
            username: username.unwrap_or_default(),
            email: email.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct PasswordResetConfirmInput {
    pub new_password: Option<String>,
    pub confirm_password: Option<String>,
}

/// A confirmed replacement password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPassword(Zeroizing<String>);

impl NewPassword {
    pub fn validate(input: &PasswordResetConfirmInput) -> Result<Self, FieldErrors> {
        let mut v = FormValidator::new();
        let first = v.secret("new_password", input.new_password.as_deref());
        let second = v.secret("confirm_password", input.confirm_password.as_deref());
        if let (Some(first), Some(second)) = (&first, &second)
            && first != second
        {
            v.reject_non_field(RESET_PASSWORD_MISMATCH);
        }
        v.finish()?;
        Ok(Self(Zeroizing::new(first.unwrap_or_default())))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
mod tests {
    //! Field-level rules for the authentication forms.
    use super::*;
    use crate::domain::forms::REQUIRED;
    use rstest::{fixture, rstest};

    #[fixture]
    fn registration() -> RegistrationInput {
        RegistrationInput {
            username: Some(" alice ".into()),
            email: Some("alice@example.com".into()),
            password1: Some("s3cret pass".into()),
            password2: Some("s3cret pass".into()),
        }
    }

    #[rstest]
    fn registration_trims_username_but_not_password(registration: RegistrationInput) {
        let form = RegistrationForm::validate(&registration).expect("valid");
        assert_eq!(form.username, "alice");
        assert_eq!(form.password.as_str(), "s3cret pass");
    }

    #[rstest]
    fn registration_rejects_mismatched_passwords(mut registration: RegistrationInput) {
        registration.password2 = Some("other".into());
        let errors = RegistrationForm::validate(&registration).expect_err("mismatch");
        assert_eq!(errors.get("password2"), [PASSWORD_MISMATCH.to_owned()]);
    }

    #[rstest]
    fn registration_rejects_bad_username_characters(mut registration: RegistrationInput) {
        registration.username = Some("alice smith".into());
        let errors = RegistrationForm::validate(&registration).expect_err("bad username");
        assert_eq!(errors.get("username"), [INVALID_USERNAME.to_owned()]);
    }

    #[rstest]
    #[case(None, Some("pw"), "username")]
    #[case(Some("   "), Some("pw"), "username")]
    #[case(Some("user"), Some(""), "password")]
    fn login_requires_both_fields(
        #[case] username: Option<&str>,
        #[case] password: Option<&str>,
        #[case] field: &str,
    ) {
        let input = LoginInput {
            username: username.map(str::to_owned),
            password: password.map(str::to_owned),
            next: None,
        };
        let errors = LoginCredentials::validate(&input).expect_err("missing field");
        assert_eq!(errors.get(field), [REQUIRED.to_owned()]);
    }

    #[rstest]
    fn reset_confirm_reports_mismatch_as_non_field_error() {
        let input = PasswordResetConfirmInput {
            new_password: Some("one".into()),
            confirm_password: Some("two".into()),
        };
        let errors = NewPassword::validate(&input).expect_err("mismatch");
        assert_eq!(errors.non_field(), [RESET_PASSWORD_MISMATCH.to_owned()]);
    }

    #[rstest]
    fn reset_request_requires_valid_email() {
        let input = PasswordResetRequestInput {
            username: Some("alice".into()),
            email: Some("nope".into()),
        };
        let errors = PasswordResetRequest::validate(&input).expect_err("bad email");
        assert!(errors.has("email"));
    }
}
