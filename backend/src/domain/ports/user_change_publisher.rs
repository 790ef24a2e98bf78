//! Port for announcing committed user writes.

use crate::domain::UserChange;

/// Hands user changes to whatever mirrors them elsewhere.
///
/// Publishing never fails from the caller's point of view: adapters log and
/// drop events they cannot accept so user writes are never rolled back or
/// delayed by identity sync.
#[cfg_attr(test, mockall::automock)]
pub trait UserChangePublisher: Send + Sync {
    fn publish(&self, change: UserChange);
}

/// Publisher that discards every change.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserChangePublisher;

impl UserChangePublisher for FixtureUserChangePublisher {
    fn publish(&self, change: UserChange) {
        tracing::debug!(operation = change.operation(), "discarding user change");
    }
}
