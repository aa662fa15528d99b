//! Application settings loaded via OrthoConfig.
//!
//! Values layer as defaults, then configuration file, then `ECOACTIONS_*`
//! environment variables, then command-line flags. The boolean session
//! toggles are read by [`crate::inbound::http::session_config`] instead.

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MEDIA_ROOT: &str = "media";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
/// 10 MiB across all parts of one multipart body.
pub const DEFAULT_UPLOAD_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Runtime configuration for the web server and admin CLI.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ECOACTIONS")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL connection string. Without it the in-memory store is used.
    pub database_url: Option<String>,
    /// Directory uploaded files are written under.
    pub media_root: Option<PathBuf>,
    /// Maximum accepted multipart body size in bytes.
    pub upload_limit_bytes: Option<usize>,
    /// File holding the session signing key material.
    pub session_key_file: Option<PathBuf>,
    /// `SameSite` policy for the session cookie: `Strict`, `Lax` or `None`.
    pub session_same_site: Option<String>,
}

impl AppSettings {
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or_else(default_bind_addr)
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn media_root(&self) -> PathBuf {
        self.media_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MEDIA_ROOT))
    }

    pub fn upload_limit_bytes(&self) -> usize {
        self.upload_limit_bytes
            .unwrap_or(DEFAULT_UPLOAD_LIMIT_BYTES)
    }

    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

#[cfg(test)]
mod tests {
    //! Settings layering from the environment.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 6] = [
        "ECOACTIONS_BIND_ADDR",
        "ECOACTIONS_DATABASE_URL",
        "ECOACTIONS_MEDIA_ROOT",
        "ECOACTIONS_UPLOAD_LIMIT_BYTES",
        "ECOACTIONS_SESSION_KEY_FILE",
        "ECOACTIONS_SESSION_SAME_SITE",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("ecoactions")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr().to_string(), DEFAULT_BIND_ADDR);
        assert!(settings.database_url().is_none());
        assert_eq!(settings.media_root(), PathBuf::from(DEFAULT_MEDIA_ROOT));
        assert_eq!(settings.upload_limit_bytes(), DEFAULT_UPLOAD_LIMIT_BYTES);
        assert_eq!(
            settings.session_key_file(),
            PathBuf::from(DEFAULT_SESSION_KEY_FILE)
        );
        assert!(settings.session_same_site.is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("ECOACTIONS_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "ECOACTIONS_DATABASE_URL",
                Some("postgres://localhost/ecoactions".to_owned()),
            ),
            ("ECOACTIONS_MEDIA_ROOT", Some("/srv/media".to_owned())),
            ("ECOACTIONS_UPLOAD_LIMIT_BYTES", Some("2048".to_owned())),
            ("ECOACTIONS_SESSION_KEY_FILE", None::<String>),
            ("ECOACTIONS_SESSION_SAME_SITE", Some("Strict".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr().to_string(), "127.0.0.1:9000");
        assert_eq!(
            settings.database_url(),
            Some("postgres://localhost/ecoactions")
        );
        assert_eq!(settings.media_root(), PathBuf::from("/srv/media"));
        assert_eq!(settings.upload_limit_bytes(), 2048);
        assert_eq!(settings.session_same_site.as_deref(), Some("Strict"));
    }

    #[rstest]
    fn blank_database_url_selects_the_in_memory_store() {
        let _guard = lock_env([("ECOACTIONS_DATABASE_URL", Some("   ".to_owned()))]);

        let settings = load_from_empty_args();
        assert!(settings.database_url().is_none());
    }
}
