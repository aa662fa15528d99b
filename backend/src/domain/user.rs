//! Accounts and the per-user activity records hanging off them.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::Serialize;

use super::{LoginActivityId, UserHistoryId, UserId, UserProfileId};

/// Maximum username length in characters.
pub const USERNAME_MAX: usize = 150;

pub const INVALID_USERNAME: &str =
    "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.";

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();

fn username_regex() -> &'static Regex {
    USERNAME_RE.get_or_init(|| {
        Regex::new(r"^[\w.@+-]+$")
            .unwrap_or_else(|error| panic!("username regex failed to compile: {error}"))
    })
}

/// Whether `candidate` only uses the characters allowed in usernames.
///
/// # Examples
/// ```
/// use ecoactions::domain::user::is_valid_username;
///
/// assert!(is_valid_username("green.fan+1@club"));
/// assert!(!is_valid_username("two words"));
/// ```
pub fn is_valid_username(candidate: &str) -> bool {
    username_regex().is_match(candidate)
}

/// A registered account.
///
/// `password_hash` is a PHC string and never leaves the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub is_staff: bool,
    pub date_joined: DateTime<Utc>,
}

/// The identity shown in page headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub username: String,
    pub is_staff: bool,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            is_staff: user.is_staff,
        }
    }
}

/// Free-form profile created alongside every account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub id: UserProfileId,
    pub user_id: UserId,
    pub bio: String,
}

/// Server-side per-day visit counter for the history page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserHistory {
    pub id: UserHistoryId,
    pub user_id: UserId,
    pub visit_date: NaiveDate,
    pub visit_count: i32,
}

/// One row per user per day on which they logged in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginActivity {
    pub id: LoginActivityId,
    pub user_id: UserId,
    pub login_date: NaiveDate,
}
