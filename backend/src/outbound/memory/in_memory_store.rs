//! Process-local implementation of every repository port.
//!
//! Used when no database URL is configured and by the HTTP tests. Unique
//! constraints and category nulling mirror the SQL schema so callers see
//! the same conflicts and the same constraint names.

use std::cmp::Reverse;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::ports::{
    ActionRepository, ActivityRepository, CATEGORIES_NAME_KEY, CategoryRepository,
    EngagementRepository, EventRepository, RepositoryError, SiteSettingsRepository,
    TeamRepository, USERS_EMAIL_KEY, USERS_USERNAME_KEY, UserRepository,
};
use crate::domain::{
    Category, CategoryId, ContactMessage, EcoAction, EcoActionId, Event, EventId, Feedback,
    LoginActivity, LoginActivityId, SearchLog, SearchResults, SiteSettings, TeamMember,
    TeamMemberId, Upload, User, UserHistory, UserHistoryId, UserId, UserProfile, UserProfileId,
    Visit,
};

#[derive(Default)]
struct State {
    users: Vec<User>,
    profiles: Vec<UserProfile>,
    history: Vec<UserHistory>,
    logins: Vec<LoginActivity>,
    categories: Vec<Category>,
    actions: Vec<EcoAction>,
    uploads: Vec<Upload>,
    events: Vec<Event>,
    team: Vec<TeamMember>,
    settings: Option<SiteSettings>,
    feedback: Vec<Feedback>,
    contacts: Vec<ContactMessage>,
    visits: Vec<Visit>,
    searches: Vec<SearchLog>,
}

/// Thread-safe store holding every table in one mutex.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::connection("in-memory store lock poisoned"))
    }
}

fn take_limit<T: Clone>(rows: &[T], limit: i64) -> Vec<T> {
    let limit = usize::try_from(limit).unwrap_or(0);
    rows.iter().take(limit).cloned().collect()
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: &User) -> Result<UserProfile, RepositoryError> {
        let mut state = self.lock()?;
        if state.users.iter().any(|u| u.username == user.username) {
            return Err(RepositoryError::conflict(USERS_USERNAME_KEY));
        }
        if state.users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::conflict(USERS_EMAIL_KEY));
        }
        let profile = UserProfile {
            id: UserProfileId::random(),
            user_id: user.id,
            bio: String::new(),
        };
        state.users.push(user.clone());
        state.profiles.push(profile.clone());
        Ok(profile)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.lock()?.users.iter().find(|u| u.id == *id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .lock()?
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_username_and_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .lock()?
            .users
            .iter()
            .find(|u| u.username == username && u.email == email)
            .cloned())
    }

    async fn username_exists(&self, username: &str) -> Result<bool, RepositoryError> {
        Ok(self.lock()?.users.iter().any(|u| u.username == username))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError> {
        Ok(self.lock()?.users.iter().any(|u| u.email == email))
    }

    async fn update_password(
        &self,
        id: &UserId,
        password_hash: &str,
    ) -> Result<bool, RepositoryError> {
        let mut state = self.lock()?;
        let Some(user) = state.users.iter_mut().find(|u| u.id == *id) else {
            return Ok(false);
        };
        password_hash.clone_into(&mut user.password_hash);
        Ok(true)
    }

    async fn set_staff(&self, username: &str, is_staff: bool) -> Result<bool, RepositoryError> {
        let mut state = self.lock()?;
        let Some(user) = state.users.iter_mut().find(|u| u.username == username) else {
            return Ok(false);
        };
        user.is_staff = is_staff;
        Ok(true)
    }

    async fn profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, RepositoryError> {
        Ok(self
            .lock()?
            .profiles
            .iter()
            .find(|p| p.user_id == *user_id)
            .cloned())
    }
}

#[async_trait]
impl ActivityRepository for InMemoryStore {
    async fn record_login(
        &self,
        user_id: &UserId,
        date: NaiveDate,
    ) -> Result<bool, RepositoryError> {
        let mut state = self.lock()?;
        if state
            .logins
            .iter()
            .any(|l| l.user_id == *user_id && l.login_date == date)
        {
            return Ok(false);
        }
        state.logins.push(LoginActivity {
            id: LoginActivityId::random(),
            user_id: *user_id,
            login_date: date,
        });
        Ok(true)
    }

    async fn login_dates(&self, user_id: &UserId) -> Result<Vec<NaiveDate>, RepositoryError> {
        let state = self.lock()?;
        let mut dates: Vec<NaiveDate> = state
            .logins
            .iter()
            .filter(|l| l.user_id == *user_id)
            .map(|l| l.login_date)
            .collect();
        dates.sort_unstable_by_key(|d| Reverse(*d));
        Ok(dates)
    }

    async fn bump_history(
        &self,
        user_id: &UserId,
        date: NaiveDate,
    ) -> Result<UserHistory, RepositoryError> {
        let mut state = self.lock()?;
        if let Some(row) = state
            .history
            .iter_mut()
            .find(|h| h.user_id == *user_id && h.visit_date == date)
        {
            row.visit_count += 1;
            return Ok(row.clone());
        }
        let row = UserHistory {
            id: UserHistoryId::random(),
            user_id: *user_id,
            visit_date: date,
            visit_count: 1,
        };
        state.history.push(row.clone());
        Ok(row)
    }

    async fn record_visit(&self, visit: &Visit) -> Result<(), RepositoryError> {
        let mut state = self.lock()?;
        state.visits.insert(0, visit.clone());
        Ok(())
    }

    async fn record_search(&self, log: &SearchLog) -> Result<(), RepositoryError> {
        let mut state = self.lock()?;
        state.searches.insert(0, log.clone());
        Ok(())
    }

    async fn recent_visits(&self, limit: i64) -> Result<Vec<Visit>, RepositoryError> {
        Ok(take_limit(&self.lock()?.visits, limit))
    }

    async fn recent_searches(&self, limit: i64) -> Result<Vec<SearchLog>, RepositoryError> {
        Ok(take_limit(&self.lock()?.searches, limit))
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        let mut categories = self.lock()?.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find(&self, id: &CategoryId) -> Result<Option<Category>, RepositoryError> {
        Ok(self.lock()?.categories.iter().find(|c| c.id == *id).cloned())
    }

    async fn create(&self, category: &Category) -> Result<(), RepositoryError> {
        let mut state = self.lock()?;
        if state.categories.iter().any(|c| c.name == category.name) {
            return Err(RepositoryError::conflict(CATEGORIES_NAME_KEY));
        }
        state.categories.push(category.clone());
        Ok(())
    }

    async fn delete(&self, id: &CategoryId) -> Result<bool, RepositoryError> {
        let mut state = self.lock()?;
        let before = state.categories.len();
        state.categories.retain(|c| c.id != *id);
        if state.categories.len() == before {
            return Ok(false);
        }
        let orphan = |slot: &mut Option<CategoryId>| {
            if *slot == Some(*id) {
                *slot = None;
            }
        };
        state.actions.iter_mut().for_each(|a| orphan(&mut a.category_id));
        state.uploads.iter_mut().for_each(|u| orphan(&mut u.category_id));
        state.events.iter_mut().for_each(|e| orphan(&mut e.category_id));
        Ok(true)
    }
}

#[async_trait]
impl ActionRepository for InMemoryStore {
    async fn create_action(&self, action: &EcoAction) -> Result<(), RepositoryError> {
        self.lock()?.actions.push(action.clone());
        Ok(())
    }

    async fn list_actions(&self) -> Result<Vec<EcoAction>, RepositoryError> {
        let mut actions = self.lock()?.actions.clone();
        actions.sort_by_key(|a| Reverse(a.created_at));
        Ok(actions)
    }

    async fn find_action(&self, id: &EcoActionId) -> Result<Option<EcoAction>, RepositoryError> {
        Ok(self.lock()?.actions.iter().find(|a| a.id == *id).cloned())
    }

    async fn create_upload(&self, upload: &Upload) -> Result<(), RepositoryError> {
        self.lock()?.uploads.push(upload.clone());
        Ok(())
    }

    async fn uploads_for(&self, user_id: &UserId) -> Result<Vec<Upload>, RepositoryError> {
        let state = self.lock()?;
        let mut uploads: Vec<Upload> = state
            .uploads
            .iter()
            .filter(|u| u.user_id == *user_id)
            .cloned()
            .collect();
        uploads.sort_by_key(|u| Reverse(u.uploaded_at));
        Ok(uploads)
    }

    async fn search(&self, term: &str) -> Result<SearchResults, RepositoryError> {
        let needle = term.to_lowercase();
        let state = self.lock()?;
        let mut actions: Vec<EcoAction> = state
            .actions
            .iter()
            .filter(|a| contains_ci(&a.title, &needle) || contains_ci(&a.description, &needle))
            .cloned()
            .collect();
        actions.sort_by_key(|a| Reverse(a.created_at));
        let mut uploads: Vec<Upload> = state
            .uploads
            .iter()
            .filter(|u| contains_ci(&u.title, &needle) || contains_ci(&u.description, &needle))
            .cloned()
            .collect();
        uploads.sort_by_key(|u| Reverse(u.uploaded_at));
        Ok(SearchResults { actions, uploads })
    }
}

#[async_trait]
impl EventRepository for InMemoryStore {
    async fn create(&self, event: &Event) -> Result<(), RepositoryError> {
        self.lock()?.events.push(event.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Event>, RepositoryError> {
        let mut events = self.lock()?.events.clone();
        events.sort_by_key(|e| Reverse((e.date, e.time)));
        Ok(events)
    }

    async fn record_view(&self, id: &EventId) -> Result<Option<Event>, RepositoryError> {
        let mut state = self.lock()?;
        Ok(state.events.iter_mut().find(|e| e.id == *id).map(|event| {
            event.views = event.views.saturating_add(1);
            event.clone()
        }))
    }
}

#[async_trait]
impl TeamRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<TeamMember>, RepositoryError> {
        let mut team = self.lock()?.team.clone();
        team.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(team)
    }

    async fn find(&self, id: &TeamMemberId) -> Result<Option<TeamMember>, RepositoryError> {
        Ok(self.lock()?.team.iter().find(|m| m.id == *id).cloned())
    }

    async fn create(&self, member: &TeamMember) -> Result<(), RepositoryError> {
        self.lock()?.team.push(member.clone());
        Ok(())
    }

    async fn update(&self, member: &TeamMember) -> Result<bool, RepositoryError> {
        let mut state = self.lock()?;
        let Some(slot) = state.team.iter_mut().find(|m| m.id == member.id) else {
            return Ok(false);
        };
        *slot = member.clone();
        Ok(true)
    }

    async fn delete(&self, id: &TeamMemberId) -> Result<bool, RepositoryError> {
        let mut state = self.lock()?;
        let before = state.team.len();
        state.team.retain(|m| m.id != *id);
        Ok(state.team.len() != before)
    }
}

#[async_trait]
impl SiteSettingsRepository for InMemoryStore {
    async fn load(&self) -> Result<Option<SiteSettings>, RepositoryError> {
        Ok(self.lock()?.settings.clone())
    }

    async fn save(&self, settings: &SiteSettings) -> Result<(), RepositoryError> {
        self.lock()?.settings = Some(settings.clone());
        Ok(())
    }
}

#[async_trait]
impl EngagementRepository for InMemoryStore {
    async fn create_feedback(&self, feedback: &Feedback) -> Result<(), RepositoryError> {
        self.lock()?.feedback.insert(0, feedback.clone());
        Ok(())
    }

    async fn list_feedback(&self) -> Result<Vec<Feedback>, RepositoryError> {
        Ok(self.lock()?.feedback.clone())
    }

    async fn create_contact(&self, message: &ContactMessage) -> Result<(), RepositoryError> {
        self.lock()?.contacts.insert(0, message.clone());
        Ok(())
    }

    async fn list_contacts(&self) -> Result<Vec<ContactMessage>, RepositoryError> {
        Ok(self.lock()?.contacts.clone())
    }
}
