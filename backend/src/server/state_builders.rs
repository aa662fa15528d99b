//! Builders for the HTTP state and its repository ports.

use std::sync::Arc;

use mockable::DefaultClock;
use tracing::{info, warn};

use ecoactions::domain::ports::BlobStore;
use ecoactions::inbound::http::render::HtmlShellRenderer;
use ecoactions::inbound::http::state::{HttpState, HttpStatePorts};
use ecoactions::outbound::memory::InMemoryStore;
use ecoactions::outbound::persistence::{
    DbPool, DieselActionRepository, DieselActivityRepository, DieselCategoryRepository,
    DieselEngagementRepository, DieselEventRepository, DieselSiteSettingsRepository,
    DieselTeamRepository, DieselUserRepository,
};
use ecoactions::outbound::security::Argon2PasswordHasher;
use ecoactions::outbound::storage::CapStdBlobStore;

use super::ServerConfig;

/// Repository ports backed by PostgreSQL.
fn diesel_ports(pool: &DbPool, blobs: Arc<dyn BlobStore>) -> HttpStatePorts {
    HttpStatePorts {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        activity: Arc::new(DieselActivityRepository::new(pool.clone())),
        categories: Arc::new(DieselCategoryRepository::new(pool.clone())),
        actions: Arc::new(DieselActionRepository::new(pool.clone())),
        events: Arc::new(DieselEventRepository::new(pool.clone())),
        team: Arc::new(DieselTeamRepository::new(pool.clone())),
        site_settings: Arc::new(DieselSiteSettingsRepository::new(pool.clone())),
        engagement: Arc::new(DieselEngagementRepository::new(pool.clone())),
        blobs,
        hasher: Arc::new(Argon2PasswordHasher::new()),
        clock: Arc::new(DefaultClock),
    }
}

/// Build the handler state, using the database when a pool is configured
/// and a process-local store otherwise.
///
/// # Errors
/// Returns [`std::io::Error`] when the media root cannot be opened.
pub(crate) fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let blobs: Arc<dyn BlobStore> = Arc::new(
        CapStdBlobStore::open(&config.media_root)
            .map_err(|err| std::io::Error::other(format!("media root unavailable: {err}")))?,
    );
    let ports = match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL repositories");
            diesel_ports(pool, blobs)
        }
        None => {
            warn!("no database configured; data is kept in memory and lost on restart");
            HttpStatePorts::from_store(
                &Arc::new(InMemoryStore::new()),
                blobs,
                Arc::new(Argon2PasswordHasher::new()),
                Arc::new(DefaultClock),
            )
        }
    };
    Ok(HttpState::new(
        ports,
        Arc::new(HtmlShellRenderer),
        config.upload_limit,
    ))
}
