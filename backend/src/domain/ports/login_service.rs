//! Driving port for login/authentication use-cases.
//!
//! Inbound adapters call it to authenticate credentials without knowing the
//! backing identity infrastructure, so handler tests can substitute a double.

use async_trait::async_trait;

use crate::domain::{BOOTSTRAP_ADMIN_EMAIL, BOOTSTRAP_ADMIN_ID, Error, LoginCredentials, UserId};

/// Domain use-case port for authentication.
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user id.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}

/// Development authenticator used when no identity provider is configured.
///
/// `admin@example.org` / `password` signs in as the bootstrap super admin.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        if credentials.email().as_ref() == BOOTSTRAP_ADMIN_EMAIL
            && credentials.password() == "password"
        {
            Ok(BOOTSTRAP_ADMIN_ID)
        } else {
            Err(Error::unauthorized("invalid credentials"))
        }
    }
}
