//! Port for the external authentication identity service.
//!
//! Local user records are the source of truth; the provider holds a mirrored
//! account per user keyed by the user id, used only for sign-in.

use async_trait::async_trait;

use crate::domain::{DisplayName, EmailAddress, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity provider adapters.
    pub enum IdentityProviderError {
        /// No account exists for the uid.
        NotFound { uid: String } => "identity {uid} not found",
        /// Email/password pair was not accepted.
        InvalidCredentials => "invalid credentials",
        /// The provider refused the request.
        Rejected { message: String } => "identity provider rejected request: {message}",
        /// The provider could not be reached or answered unexpectedly.
        Unavailable { message: String } => "identity provider unavailable: {message}",
    }
}

/// Account to create in the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIdentity {
    pub uid: UserId,
    pub email: EmailAddress,
    pub display_name: DisplayName,
    pub disabled: bool,
}

/// Partial account update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityPatch {
    pub email: Option<EmailAddress>,
    pub display_name: Option<DisplayName>,
    pub disabled: Option<bool>,
}

impl IdentityPatch {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.display_name.is_none() && self.disabled.is_none()
    }
}

/// Admin operations against the identity provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn create(&self, identity: &NewIdentity) -> Result<(), IdentityProviderError>;

    async fn update(
        &self,
        uid: UserId,
        patch: &IdentityPatch,
    ) -> Result<(), IdentityProviderError>;

    async fn delete(&self, uid: UserId) -> Result<(), IdentityProviderError>;

    /// Check a password and return the uid of the matching account.
    async fn verify_password(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<UserId, IdentityProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn empty_patch_reports_empty() {
        assert!(IdentityPatch::default().is_empty());
        let patch = IdentityPatch {
            disabled: Some(true),
            ..IdentityPatch::default()
        };
        assert!(!patch.is_empty());
    }

    #[rstest]
    fn not_found_names_the_uid() {
        let err = IdentityProviderError::not_found("abc");
        assert_eq!(err.to_string(), "identity abc not found");
    }
}
