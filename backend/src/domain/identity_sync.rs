//! Mirror user writes into the identity provider.
//!
//! Each [`UserChangeEnvelope`] is handled exactly once. Failures are logged
//! and dropped; nothing is retried and nothing reaches the API caller.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::domain::ports::{
    IdentityPatch, IdentityProvider, IdentityProviderError, NewIdentity,
};
use crate::domain::{User, UserChange, UserChangeEnvelope};

/// What a handled change did to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Created,
    Updated,
    /// Nothing the provider mirrors changed.
    Skipped,
    Deleted,
    /// The account was already gone when deleting.
    AlreadyAbsent,
}

/// Applies user changes to an [`IdentityProvider`].
pub struct IdentitySync<P> {
    provider: Arc<P>,
}

impl<P> Clone for IdentitySync<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
        }
    }
}

fn identity_patch(before: &User, after: &User) -> IdentityPatch {
    IdentityPatch {
        email: (before.email != after.email).then(|| after.email.clone()),
        display_name: (before.display_name != after.display_name)
            .then(|| after.display_name.clone()),
        disabled: (before.active != after.active).then_some(!after.active),
    }
}

impl<P> IdentitySync<P>
where
    P: IdentityProvider,
{
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }

    /// Apply one change to the provider.
    ///
    /// # Errors
    /// Returns the provider error unchanged, except a missing account on
    /// delete, which is reported as [`SyncOutcome::AlreadyAbsent`].
    pub async fn handle(&self, change: &UserChange) -> Result<SyncOutcome, IdentityProviderError> {
        match change {
            UserChange::Created(user) => {
                let identity = NewIdentity {
                    uid: user.id,
                    email: user.email.clone(),
                    display_name: user.display_name.clone(),
                    disabled: !user.active,
                };
                self.provider.create(&identity).await?;
                Ok(SyncOutcome::Created)
            }
            UserChange::Updated { before, after } => {
                let patch = identity_patch(before, after);
                if patch.is_empty() {
                    return Ok(SyncOutcome::Skipped);
                }
                self.provider.update(after.id, &patch).await?;
                Ok(SyncOutcome::Updated)
            }
            UserChange::Deleted(user) => match self.provider.delete(user.id).await {
                Ok(()) => Ok(SyncOutcome::Deleted),
                Err(IdentityProviderError::NotFound { .. }) => Ok(SyncOutcome::AlreadyAbsent),
                Err(err) => Err(err),
            },
        }
    }

    /// Handle an envelope and log the result.
    pub async fn process(&self, envelope: UserChangeEnvelope) -> Option<SyncOutcome> {
        let user_id = envelope.change.subject().id;
        let operation = envelope.change.operation();
        let trace_id = envelope
            .trace_id
            .map(|id| id.to_string())
            .unwrap_or_default();
        match self.handle(&envelope.change).await {
            Ok(SyncOutcome::AlreadyAbsent) => {
                warn!(%user_id, operation, %trace_id, "identity already absent");
                Some(SyncOutcome::AlreadyAbsent)
            }
            Ok(outcome) => {
                info!(%user_id, operation, %trace_id, ?outcome, "identity synced");
                Some(outcome)
            }
            Err(err) => {
                error!(%user_id, operation, %trace_id, error = %err, "identity sync failed");
                None
            }
        }
    }
}
