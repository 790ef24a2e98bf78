//! Password sign-in backed by the identity provider.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{IdentityProvider, IdentityProviderError, LoginService, UserRepository};
use crate::domain::{Error, LoginCredentials, UserId};

/// [`LoginService`] that checks passwords with the identity provider and then
/// requires an active local user with the returned uid.
pub struct IdentityLoginService<P: ?Sized, U: ?Sized> {
    provider: Arc<P>,
    users: Arc<U>,
}

impl<P: ?Sized, U: ?Sized> IdentityLoginService<P, U> {
    pub fn new(provider: Arc<P>, users: Arc<U>) -> Self {
        Self { provider, users }
    }
}

fn map_provider_error(error: IdentityProviderError) -> Error {
    match error {
        IdentityProviderError::InvalidCredentials | IdentityProviderError::NotFound { .. } => {
            Error::unauthorized("invalid credentials")
        }
        IdentityProviderError::Rejected { message } => {
            warn!(%message, "identity provider rejected password check");
            Error::unauthorized("invalid credentials")
        }
        IdentityProviderError::Unavailable { message } => {
            Error::service_unavailable(format!("identity provider unavailable: {message}"))
        }
    }
}

#[async_trait]
impl<P, U> LoginService for IdentityLoginService<P, U>
where
    P: IdentityProvider + ?Sized,
    U: UserRepository + ?Sized,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let uid = self
            .provider
            .verify_password(credentials.email(), credentials.password())
            .await
            .map_err(map_provider_error)?;

        let Some(user) = self.users.find_by_id(uid).await? else {
            warn!(user_id = %uid, "identity has no local user");
            return Err(Error::unauthorized("invalid credentials"));
        };
        if !user.active {
            return Err(Error::forbidden("account is deactivated"));
        }
        info!(user_id = %uid, "user signed in");
        Ok(uid)
    }
}
