//! Bounded in-process queue feeding the identity-sync worker.
//!
//! [`ChannelUserChangePublisher`] is the sending half handed to the user
//! service; [`run_identity_sync`] drains the receiving half on its own task.
//! User writes never wait on the worker: a full or closed queue drops the
//! change with a warning.

use tokio::sync::mpsc::{self, Receiver, Sender, error::TrySendError};
use tracing::{debug, info, warn};

use crate::domain::ports::{IdentityProvider, UserChangePublisher};
use crate::domain::{IdentitySync, UserChange, UserChangeEnvelope};

/// Queue capacity used when none is configured.
pub const DEFAULT_SYNC_QUEUE_CAPACITY: usize = 256;

/// Publishes user changes onto a bounded tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelUserChangePublisher {
    sender: Sender<UserChangeEnvelope>,
}

impl ChannelUserChangePublisher {
    /// Create a publisher and the receiver the worker should drain.
    ///
    /// A zero capacity is raised to one.
    pub fn bounded(capacity: usize) -> (Self, Receiver<UserChangeEnvelope>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }
}

impl UserChangePublisher for ChannelUserChangePublisher {
    fn publish(&self, change: UserChange) {
        let user_id = change.subject().id;
        let operation = change.operation();
        match self.sender.try_send(UserChangeEnvelope::capture(change)) {
            Ok(()) => debug!(%user_id, operation, "queued identity sync"),
            Err(TrySendError::Full(_)) => {
                warn!(%user_id, operation, "identity sync queue full; change dropped");
            }
            Err(TrySendError::Closed(_)) => {
                warn!(%user_id, operation, "identity sync worker stopped; change dropped");
            }
        }
    }
}

/// Drain `receiver` until every publisher is dropped, applying each change
/// once. Returns the number of envelopes processed.
pub async fn run_identity_sync<P>(
    mut receiver: Receiver<UserChangeEnvelope>,
    sync: IdentitySync<P>,
) -> u64
where
    P: IdentityProvider,
{
    let mut processed = 0_u64;
    while let Some(envelope) = receiver.recv().await {
        sync.process(envelope).await;
        processed += 1;
    }
    info!(processed, "identity sync worker stopped");
    processed
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::ports::MockIdentityProvider;
    use crate::domain::test_support::user;
    use crate::domain::{OrganizationId, TraceId, UserRole};
    use rstest::rstest;

    fn created() -> UserChange {
        UserChange::Created(user(
            OrganizationId::random(),
            "porter@example.org",
            UserRole::Staff,
        ))
    }

    #[rstest]
    #[tokio::test]
    async fn published_changes_carry_the_current_trace_id() {
        let (publisher, mut receiver) = ChannelUserChangePublisher::bounded(4);
        let trace_id = TraceId::generate();

        TraceId::scope(trace_id, async {
            publisher.publish(created());
        })
        .await;

        let envelope = receiver.recv().await.expect("queued change");
        assert_eq!(envelope.trace_id, Some(trace_id));
        assert_eq!(envelope.change.operation(), "create");
    }

    #[rstest]
    #[tokio::test]
    async fn full_queue_drops_without_blocking() {
        let (publisher, mut receiver) = ChannelUserChangePublisher::bounded(1);
        publisher.publish(created());
        publisher.publish(created());

        assert!(receiver.recv().await.is_some());
        assert!(receiver.try_recv().is_err(), "second change was dropped");
    }

    #[rstest]
    #[tokio::test]
    async fn closed_queue_is_tolerated() {
        let (publisher, receiver) = ChannelUserChangePublisher::bounded(1);
        drop(receiver);
        publisher.publish(created());
    }

    #[rstest]
    #[tokio::test]
    async fn worker_processes_each_change_once_and_stops_with_publishers() {
        let mut provider = MockIdentityProvider::new();
        provider.expect_create().times(2).returning(|_| Ok(()));
        let (publisher, receiver) = ChannelUserChangePublisher::bounded(8);
        let worker = tokio::spawn(run_identity_sync(
            receiver,
            IdentitySync::new(Arc::new(provider)),
        ));

        publisher.publish(created());
        publisher.publish(created());
        drop(publisher);

        assert_eq!(worker.await.expect("worker join"), 2);
    }
}
