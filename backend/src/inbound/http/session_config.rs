//! Session cookie settings.
//!
//! The toggles come from the server settings; this module validates them per
//! build mode and builds the cookie session middleware.

use std::path::{Path, PathBuf};

use actix_session::SessionMiddleware;
use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::time::Duration;
use actix_web::cookie::{Key, SameSite};
use tracing::warn;
use zeroize::Zeroize;

/// Default location of the session key secret.
pub const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;
const SESSION_TTL_HOURS: i64 = 8;
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings for missing toggles.
    Debug,
    /// Release builds require explicit, valid session toggles.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hospadmin::inbound::http::session_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// assert_eq!(mode == BuildMode::Debug, cfg!(debug_assertions));
    /// ```
    #[must_use]
    pub const fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    const fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Raw session toggles as loaded from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionToggles {
    pub key_file: Option<PathBuf>,
    pub allow_ephemeral: Option<bool>,
    pub cookie_secure: Option<bool>,
    pub same_site: Option<String>,
}

/// Validated session settings.
#[derive(Clone)]
pub struct SessionSettings {
    /// Signing and encryption key for cookie sessions.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
    /// `SameSite` policy for session cookies.
    pub same_site: SameSite,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// A toggle required in release builds is unset.
    #[error("missing required setting: {name}")]
    Missing { name: &'static str },
    /// A toggle holds an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    Invalid {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Reading the session key file failed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The session key file is too short for release builds.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// `SameSite=None` needs secure cookies in release builds.
    #[error("same_site=None requires cookie_secure=true")]
    InsecureSameSiteNone,
    /// Release builds must not allow ephemeral session keys.
    #[error("allow_ephemeral_session_key must be false in release builds")]
    EphemeralNotAllowed,
}

/// Validate `toggles` for `mode`.
///
/// # Errors
/// Release builds reject missing toggles, `SameSite=None` without secure
/// cookies, ephemeral keys and unreadable or short key files.
///
/// # Examples
///
/// ```rust
/// use hospadmin::inbound::http::session_config::{
///     BuildMode, SessionToggles, session_settings,
/// };
///
/// let settings = session_settings(
///     &SessionToggles {
///         key_file: Some("/nonexistent/session_key".into()),
///         ..SessionToggles::default()
///     },
///     BuildMode::Debug,
/// )
/// .expect("debug builds fall back to an ephemeral key");
/// assert!(settings.cookie_secure);
/// ```
pub fn session_settings(
    toggles: &SessionToggles,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = cookie_secure(toggles.cookie_secure, mode)?;
    let same_site = same_site(toggles.same_site.as_deref(), mode, cookie_secure)?;
    let allow_ephemeral = allow_ephemeral(toggles.allow_ephemeral, mode)?;
    let path = toggles
        .key_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(SESSION_KEY_DEFAULT_PATH));
    let key = session_key(&path, mode, allow_ephemeral)?;
    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

/// Private, HTTP-only cookie session named `session`.
pub fn session_middleware(settings: &SessionSettings) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), settings.key.clone())
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(settings.cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(settings.same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(Duration::hours(SESSION_TTL_HOURS)),
        )
        .build()
}

fn cookie_secure(value: Option<bool>, mode: BuildMode) -> Result<bool, SessionConfigError> {
    match value {
        Some(flag) => Ok(flag),
        None if mode.is_debug() => {
            warn!("cookie_secure not set; defaulting to secure");
            Ok(true)
        }
        None => Err(SessionConfigError::Missing {
            name: "cookie_secure",
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
    let Some(raw) = value else {
        if mode.is_debug() {
            warn!("same_site not set; using default");
            return Ok(fallback);
        }
        return Err(SessionConfigError::Missing { name: "same_site" });
    };

    match raw.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" if mode.is_debug() => {
            warn!("same_site=None without secure cookies; browsers may reject the cookie");
            Ok(SameSite::None)
        }
        "none" => Err(SessionConfigError::InsecureSameSiteNone),
        _ if mode.is_debug() => {
            warn!(value = %raw, "invalid same_site, using default");
            Ok(fallback)
        }
        _ => Err(SessionConfigError::Invalid {
            name: "same_site",
            value: raw.to_owned(),
            expected: SAMESITE_EXPECTED,
        }),
    }
}

fn allow_ephemeral(value: Option<bool>, mode: BuildMode) -> Result<bool, SessionConfigError> {
    match value {
        Some(true) if !mode.is_debug() => Err(SessionConfigError::EphemeralNotAllowed),
        Some(flag) => Ok(flag),
        None => Ok(false),
    }
}

fn session_key(path: &Path, mode: BuildMode, allow_ephemeral: bool) -> Result<Key, SessionConfigError> {
    match std::fs::read(path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if mode == BuildMode::Release && length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path: path.to_path_buf(),
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(source) => Err(SessionConfigError::KeyRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}
