//! Wire shapes of the identity provider admin API.

use serde::{Deserialize, Serialize};

use crate::domain::ports::{IdentityPatch, NewIdentity};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreateAccountDto<'a> {
    pub(super) uid: String,
    pub(super) email: &'a str,
    pub(super) display_name: &'a str,
    pub(super) disabled: bool,
}

impl<'a> From<&'a NewIdentity> for CreateAccountDto<'a> {
    fn from(identity: &'a NewIdentity) -> Self {
        Self {
            uid: identity.uid.to_string(),
            email: identity.email.as_ref(),
            display_name: identity.display_name.as_ref(),
            disabled: identity.disabled,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UpdateAccountDto<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) display_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) disabled: Option<bool>,
}

impl<'a> From<&'a IdentityPatch> for UpdateAccountDto<'a> {
    fn from(patch: &'a IdentityPatch) -> Self {
        Self {
            email: patch.email.as_ref().map(AsRef::as_ref),
            display_name: patch.display_name.as_ref().map(AsRef::as_ref),
            disabled: patch.disabled,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct VerifyPasswordDto<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct VerifiedAccountDto {
    pub(super) uid: String,
}

/// Error body returned by the provider, when it sends one.
#[derive(Debug, Default, Deserialize)]
pub(super) struct ProviderErrorDto {
    #[serde(default)]
    pub(super) message: String,
}
