//! Session cookie configuration.
//!
//! Turns the session toggles into the key and cookie attributes used by the
//! session middleware. Paths and the `SameSite` policy come from
//! [`AppSettings`]; the boolean toggles are read straight from the environment
//! so an unset variable stays unset. Debug builds fall back to permissive
//! defaults with a warning; release builds reject anything missing or unsafe.

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use tracing::warn;
use zeroize::Zeroize;

use crate::settings::AppSettings;

pub mod fingerprint;

const SESSION_KEY_MIN_LEN: usize = 64;
/// `Key::derive_from` needs at least this much material in any mode.
const KEY_DERIVE_MIN_LEN: usize = 32;
const COOKIE_SECURE_SETTING: &str = COOKIE_SECURE_ENV;
const SAME_SITE_SETTING: &str = "session_same_site";
const SAME_SITE_EXPECTED: &str = "Strict|Lax|None";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
pub const COOKIE_SECURE_ENV: &str = "ECOACTIONS_SESSION_COOKIE_SECURE";
pub const ALLOW_EPHEMERAL_ENV: &str = "ECOACTIONS_SESSION_ALLOW_EPHEMERAL";

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Missing toggles fall back to defaults.
    Debug,
    /// Every toggle must be set explicitly.
    Release,
}

impl BuildMode {
    /// Pick the mode matching `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Raw session toggles before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToggles {
    pub key_file: PathBuf,
    pub cookie_secure: Option<bool>,
    pub same_site: Option<String>,
    pub allow_ephemeral: bool,
}

impl SessionToggles {
    /// Combine file-backed settings with the boolean toggles from `env`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ecoactions::inbound::http::session_config::{BuildMode, SessionToggles};
    /// use ecoactions::settings::AppSettings;
    /// use mockable::MockEnv;
    /// use ortho_config::OrthoConfig;
    /// use std::ffi::OsString;
    ///
    /// let settings =
    ///     AppSettings::load_from_iter([OsString::from("ecoactions")]).expect("settings");
    /// let mut env = MockEnv::new();
    /// env.expect_string().returning(|_| None);
    /// let toggles = SessionToggles::from_settings(&settings, &env, BuildMode::Debug)
    ///     .expect("toggles");
    /// assert_eq!(toggles.cookie_secure, None);
    /// assert!(!toggles.allow_ephemeral);
    /// ```
    pub fn from_settings<E: Env>(
        settings: &AppSettings,
        env: &E,
        mode: BuildMode,
    ) -> Result<Self, SessionConfigError> {
        let cookie_secure = match env_flag(env, COOKIE_SECURE_ENV) {
            Ok(flag) => flag,
            Err(value) if mode.is_debug() => {
                warn!(
                    value = %value,
                    "invalid ECOACTIONS_SESSION_COOKIE_SECURE; defaulting to secure"
                );
                Some(true)
            }
            Err(value) => return Err(invalid_flag(COOKIE_SECURE_ENV, value)),
        };
        let allow_ephemeral = env_flag(env, ALLOW_EPHEMERAL_ENV)
            .map_err(|value| invalid_flag(ALLOW_EPHEMERAL_ENV, value))?
            .unwrap_or(false);
        Ok(Self {
            key_file: settings.session_key_file(),
            cookie_secure,
            same_site: settings.session_same_site.clone(),
            allow_ephemeral,
        })
    }
}

/// `Ok(None)` when unset, `Err(raw)` when the value is not a boolean.
fn env_flag<E: Env>(env: &E, name: &str) -> Result<Option<bool>, String> {
    match env.string(name) {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => parse_bool(value.trim()).map(Some).ok_or(value),
    }
}

fn invalid_flag(name: &'static str, value: String) -> SessionConfigError {
    SessionConfigError::InvalidSetting {
        name,
        value,
        expected: BOOL_EXPECTED,
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

/// Validated session middleware settings.
pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("missing required setting: {name}")]
    MissingSetting { name: &'static str },
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidSetting {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("session_same_site=None requires session_cookie_secure=true")]
    InsecureSameSiteNone,
    #[error("session_allow_ephemeral must be false in release builds")]
    EphemeralNotAllowed,
}

/// Validate the toggles for `mode` and load the signing key.
///
/// # Examples
///
/// ```rust
/// use ecoactions::inbound::http::session_config::{
///     session_settings, BuildMode, SessionToggles,
/// };
///
/// let toggles = SessionToggles {
///     key_file: "/nonexistent/session_key".into(),
///     cookie_secure: Some(false),
///     same_site: Some("Lax".into()),
///     allow_ephemeral: true,
/// };
/// let settings = session_settings(&toggles, BuildMode::Debug).expect("debug defaults");
/// assert!(!settings.cookie_secure);
/// ```
pub fn session_settings(
    toggles: &SessionToggles,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    if toggles.allow_ephemeral && !mode.is_debug() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let cookie_secure = cookie_secure(toggles.cookie_secure, mode)?;
    let same_site = same_site(toggles.same_site.as_deref(), mode, cookie_secure)?;
    let key = session_key(toggles, mode)?;
    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

fn cookie_secure(value: Option<bool>, mode: BuildMode) -> Result<bool, SessionConfigError> {
    match value {
        Some(flag) => Ok(flag),
        None if mode.is_debug() => {
            warn!("session_cookie_secure not set; defaulting to secure");
            Ok(true)
        }
        None => Err(SessionConfigError::MissingSetting {
            name: COOKIE_SECURE_SETTING,
        }),
    }
}

fn same_site(
    value: Option<&str>,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let fallback = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };
    let Some(value) = value else {
        if mode.is_debug() {
            return Ok(fallback);
        }
        return Err(SessionConfigError::MissingSetting {
            name: SAME_SITE_SETTING,
        });
    };

    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" if mode.is_debug() => {
            warn!("SameSite=None without a secure cookie; browsers may drop the session");
            Ok(SameSite::None)
        }
        "none" => Err(SessionConfigError::InsecureSameSiteNone),
        _ if mode.is_debug() => {
            warn!(value = %value, "invalid session_same_site, using default");
            Ok(fallback)
        }
        _ => Err(SessionConfigError::InvalidSetting {
            name: SAME_SITE_SETTING,
            value: value.to_owned(),
            expected: SAME_SITE_EXPECTED,
        }),
    }
}

fn session_key(toggles: &SessionToggles, mode: BuildMode) -> Result<Key, SessionConfigError> {
    let path = &toggles.key_file;
    match std::fs::read(path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            let min_len = if mode.is_debug() {
                KEY_DERIVE_MIN_LEN
            } else {
                SESSION_KEY_MIN_LEN
            };
            if length < min_len {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path: path.clone(),
                    length,
                    min_len,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if mode.is_debug() || toggles.allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(source) => Err(SessionConfigError::KeyRead {
            path: path.clone(),
            source,
        }),
    }
}
