//! Events describing user writes, consumed by identity sync.

use super::{TraceId, User};

/// A committed change to a user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserChange {
    Created(User),
    Updated { before: User, after: User },
    Deleted(User),
}

impl UserChange {
    /// Short operation label for logs.
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::Created(_) => "create",
            Self::Updated { .. } => "update",
            Self::Deleted(_) => "delete",
        }
    }

    /// The user the change is about (the new state for updates).
    pub fn subject(&self) -> &User {
        match self {
            Self::Created(user) | Self::Deleted(user) => user,
            Self::Updated { after, .. } => after,
        }
    }
}

/// A [`UserChange`] plus the trace id of the request that caused it.
///
/// Task-local trace ids do not follow work onto the sync worker task, so the
/// publisher captures it here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserChangeEnvelope {
    pub trace_id: Option<TraceId>,
    pub change: UserChange,
}

impl UserChangeEnvelope {
    /// Wrap `change`, capturing the trace id currently in scope.
    pub fn capture(change: UserChange) -> Self {
        Self {
            trace_id: TraceId::current(),
            change,
        }
    }
}
