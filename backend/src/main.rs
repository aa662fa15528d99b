//! Backend entry-point: loads settings, prepares storage and serves pages.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use ecoactions::inbound::http::health::HealthState;
use ecoactions::inbound::http::session_config::fingerprint::key_fingerprint;
use ecoactions::inbound::http::session_config::{BuildMode, SessionToggles, session_settings};
use ecoactions::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use ecoactions::settings::AppSettings;

use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load()
        .map_err(|err| std::io::Error::other(format!("failed to load settings: {err}")))?;

    let mode = BuildMode::from_debug_assertions();
    let toggles = SessionToggles::from_settings(&settings, &DefaultEnv::new(), mode)
        .map_err(std::io::Error::other)?;
    let session = session_settings(&toggles, mode).map_err(std::io::Error::other)?;
    info!(
        fingerprint = %key_fingerprint(&session.key),
        cookie_secure = session.cookie_secure,
        same_site = ?session.same_site,
        "session key loaded"
    );

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        settings.bind_addr(),
        settings.media_root(),
    )
    .with_upload_limit(settings.upload_limit_bytes());

    if let Some(database_url) = settings.database_url() {
        run_pending_migrations(database_url)
            .await
            .map_err(std::io::Error::other)?;
        let pool = DbPool::new(PoolConfig::new(database_url))
            .await
            .map_err(std::io::Error::other)?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    info!(bind_addr = %settings.bind_addr(), "starting HTTP server");
    create_server(health_state, config)?.await
}
