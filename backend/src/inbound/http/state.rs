//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    ActionRepository, ActivityRepository, BlobStore, CategoryRepository, EngagementRepository,
    EventRepository, PasswordHasher, SiteSettingsRepository, TeamRepository, UserRepository,
};
use crate::domain::{
    AccountService, ActionService, ActivityService, EngagementService, EventService, TeamService,
};

use super::render::PageRenderer;

/// Parameter object bundling every port the services need.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub users: Arc<dyn UserRepository>,
    pub activity: Arc<dyn ActivityRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub actions: Arc<dyn ActionRepository>,
    pub events: Arc<dyn EventRepository>,
    pub team: Arc<dyn TeamRepository>,
    pub site_settings: Arc<dyn SiteSettingsRepository>,
    pub engagement: Arc<dyn EngagementRepository>,
    pub blobs: Arc<dyn BlobStore>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub clock: Arc<dyn Clock>,
}

impl HttpStatePorts {
    /// Use one store for every repository port.
    pub fn from_store<S>(
        store: &Arc<S>,
        blobs: Arc<dyn BlobStore>,
        hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self
    where
        S: UserRepository
            + ActivityRepository
            + CategoryRepository
            + ActionRepository
            + EventRepository
            + TeamRepository
            + SiteSettingsRepository
            + EngagementRepository
            + 'static,
    {
        Self {
            users: store.clone(),
            activity: store.clone(),
            categories: store.clone(),
            actions: store.clone(),
            events: store.clone(),
            team: store.clone(),
            site_settings: store.clone(),
            engagement: store.clone(),
            blobs,
            hasher,
            clock,
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: AccountService,
    pub actions: ActionService,
    pub events: EventService,
    pub team: TeamService,
    pub engagement: EngagementService,
    pub activity: ActivityService,
    pub pages: Arc<dyn PageRenderer>,
    /// Largest multipart body accepted, in bytes.
    pub upload_limit: usize,
}

impl HttpState {
    /// Wire the domain services over `ports`.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use ecoactions::inbound::http::render::JsonPageRenderer;
    /// use ecoactions::inbound::http::state::{HttpState, HttpStatePorts};
    /// use ecoactions::outbound::memory::InMemoryStore;
    /// use ecoactions::outbound::security::Argon2PasswordHasher;
    /// use ecoactions::outbound::storage::CapStdBlobStore;
    /// use mockable::DefaultClock;
    ///
    /// let media = std::env::temp_dir().join("ecoactions-doc-media");
    /// let blobs = CapStdBlobStore::open(&media).expect("media root");
    /// let ports = HttpStatePorts::from_store(
    ///     &Arc::new(InMemoryStore::new()),
    ///     Arc::new(blobs),
    ///     Arc::new(Argon2PasswordHasher::new()),
    ///     Arc::new(DefaultClock),
    /// );
    /// let state = HttpState::new(ports, Arc::new(JsonPageRenderer), 1024);
    /// assert_eq!(state.upload_limit, 1024);
    /// ```
    pub fn new(ports: HttpStatePorts, pages: Arc<dyn PageRenderer>, upload_limit: usize) -> Self {
        let HttpStatePorts {
            users,
            activity,
            categories,
            actions,
            events,
            team,
            site_settings,
            engagement,
            blobs,
            hasher,
            clock,
        } = ports;
        Self {
            accounts: AccountService::new(
                users.clone(),
                activity.clone(),
                hasher,
                clock.clone(),
            ),
            actions: ActionService::new(
                categories.clone(),
                actions,
                activity.clone(),
                blobs.clone(),
                clock.clone(),
            ),
            events: EventService::new(events, categories, blobs.clone(), clock.clone()),
            team: TeamService::new(team, site_settings, blobs),
            engagement: EngagementService::new(engagement, clock.clone()),
            activity: ActivityService::new(activity, users, clock),
            pages,
            upload_limit,
        }
    }
}
