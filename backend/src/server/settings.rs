//! Server settings loaded via OrthoConfig.
//!
//! Every field can come from the CLI (`--bind-addr`), the environment
//! (`HOSPADMIN_BIND_ADDR`) or a config file. Unset optional fields fall back
//! to the defaults below.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;
use zeroize::Zeroizing;

use hospadmin::inbound::http::session_config::SessionToggles;
use hospadmin::outbound::identity::IdentityProviderConfig;
use hospadmin::outbound::queue::DEFAULT_SYNC_QUEUE_CAPACITY;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_IDENTITY_TIMEOUT_SECS: u64 = 10;
const IDENTITY_TOKEN_DEFAULT_PATH: &str = "/var/run/secrets/identity_token";

/// Configuration values for the HTTP server and its adapters.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "HOSPADMIN")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL URL; the in-memory store is used when unset.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub db_pool_size: Option<u32>,
    /// File holding the session key material.
    pub session_key_file: Option<PathBuf>,
    /// Allow a generated session key when the key file is missing.
    pub allow_ephemeral_session_key: Option<bool>,
    /// Mark session cookies `Secure`.
    pub cookie_secure: Option<bool>,
    /// `SameSite` policy: `Strict`, `Lax` or `None`.
    pub same_site: Option<String>,
    /// Identity provider admin API base URL; fixture login is used when unset.
    pub identity_base_url: Option<String>,
    /// File holding the identity provider API token.
    pub identity_token_file: Option<PathBuf>,
    /// Identity provider request timeout in seconds.
    pub identity_timeout_secs: Option<u64>,
    /// Capacity of the identity sync queue.
    pub sync_queue_capacity: Option<usize>,
}

/// Errors raised while turning settings into adapter configuration.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid identity_base_url '{value}': {source}")]
    IdentityUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("failed to read identity token at {path}: {source}")]
    IdentityToken {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("identity token at {path} is empty")]
    EmptyIdentityToken { path: PathBuf },
}

impl ServerSettings {
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)))
    }

    pub fn db_pool_size(&self) -> u32 {
        self.db_pool_size.unwrap_or(DEFAULT_POOL_SIZE).max(1)
    }

    pub fn sync_queue_capacity(&self) -> usize {
        self.sync_queue_capacity.unwrap_or(DEFAULT_SYNC_QUEUE_CAPACITY)
    }

    pub fn session_toggles(&self) -> SessionToggles {
        SessionToggles {
            key_file: self.session_key_file.clone(),
            allow_ephemeral: self.allow_ephemeral_session_key,
            cookie_secure: self.cookie_secure,
            same_site: self.same_site.clone(),
        }
    }

    /// Identity provider client settings, when a base URL is configured.
    ///
    /// # Errors
    /// Fails when the URL does not parse or the token file is unreadable or
    /// empty.
    pub fn identity_provider(&self) -> Result<Option<IdentityProviderConfig>, SettingsError> {
        let Some(raw_url) = self.identity_base_url.as_deref() else {
            return Ok(None);
        };
        let base_url = Url::parse(raw_url).map_err(|source| SettingsError::IdentityUrl {
            value: raw_url.to_owned(),
            source,
        })?;
        let path = self
            .identity_token_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(IDENTITY_TOKEN_DEFAULT_PATH));
        let raw = Zeroizing::new(std::fs::read_to_string(&path).map_err(|source| {
            SettingsError::IdentityToken {
                path: path.clone(),
                source,
            }
        })?);
        let token = raw.trim();
        if token.is_empty() {
            return Err(SettingsError::EmptyIdentityToken { path });
        }
        let timeout = Duration::from_secs(
            self.identity_timeout_secs
                .unwrap_or(DEFAULT_IDENTITY_TIMEOUT_SECS),
        );
        Ok(Some(
            IdentityProviderConfig::new(base_url, token).with_timeout(timeout),
        ))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for server settings loading.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;
    use uuid::Uuid;

    const VARS: [&str; 6] = [
        "HOSPADMIN_BIND_ADDR",
        "HOSPADMIN_DATABASE_URL",
        "HOSPADMIN_DB_POOL_SIZE",
        "HOSPADMIN_IDENTITY_BASE_URL",
        "HOSPADMIN_IDENTITY_TOKEN_FILE",
        "HOSPADMIN_SYNC_QUEUE_CAPACITY",
    ];

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("hospadmin")])
            .expect("config should load")
    }

    fn env_with(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(env_with(&[]));
        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), "0.0.0.0:8080".parse().expect("addr"));
        assert_eq!(settings.db_pool_size(), DEFAULT_POOL_SIZE);
        assert_eq!(settings.sync_queue_capacity(), DEFAULT_SYNC_QUEUE_CAPACITY);
        assert!(settings.database_url.is_none());
        assert!(settings.identity_provider().expect("no identity").is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env_with(&[
            ("HOSPADMIN_BIND_ADDR", "127.0.0.1:9000"),
            ("HOSPADMIN_DATABASE_URL", "postgres://localhost/hospadmin"),
            ("HOSPADMIN_DB_POOL_SIZE", "4"),
            ("HOSPADMIN_SYNC_QUEUE_CAPACITY", "32"),
        ]));
        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), "127.0.0.1:9000".parse().expect("addr"));
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/hospadmin")
        );
        assert_eq!(settings.db_pool_size(), 4);
        assert_eq!(settings.sync_queue_capacity(), 32);
    }

    #[rstest]
    fn identity_provider_reads_trimmed_token() {
        let path = std::env::temp_dir().join(format!("hospadmin-idp-token-{}", Uuid::new_v4()));
        std::fs::write(&path, "secret-token\n").expect("write token");
        let token_path = path.display().to_string();
        let _guard = lock_env(env_with(&[
            ("HOSPADMIN_IDENTITY_BASE_URL", "https://idp.example.org/admin/v1"),
            ("HOSPADMIN_IDENTITY_TOKEN_FILE", &token_path),
        ]));
        let config = load_from_empty_args()
            .identity_provider()
            .expect("valid identity settings")
            .expect("identity configured");
        std::fs::remove_file(&path).expect("remove token");
        assert_eq!(config.base_url.as_str(), "https://idp.example.org/admin/v1");
        assert_eq!(config.api_token.as_str(), "secret-token");
    }

    #[rstest]
    fn identity_provider_rejects_bad_url() {
        let _guard = lock_env(env_with(&[("HOSPADMIN_IDENTITY_BASE_URL", "not a url")]));
        let err = load_from_empty_args()
            .identity_provider()
            .err()
            .expect("bad url");
        assert!(matches!(err, SettingsError::IdentityUrl { .. }));
    }
}
