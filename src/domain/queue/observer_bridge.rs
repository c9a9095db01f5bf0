//! Converts a push-style event stream into a single awaited result.

use std::sync::Arc;

use crate::{
    domain::queue::pending_await::{PendingAwait, Unsubscribe},
    errors::QueueError,
};

/// Await the next event of an external callback source.
///
/// `subscribe` runs synchronously before this function first suspends. It
/// must register listener(s) that resolve or reject the given
/// [`PendingAwait`], trigger the side-effecting action that produces the
/// event (only after the listeners are attached, so the event cannot fire
/// into a vacuum), and return the handle that detaches the listeners
/// again.
///
/// The first event wins; every later one is ignored and the listeners are
/// detached synchronously with the winning resolution. If the source drops
/// the token without ever resolving, the call fails with
/// [`QueueError::Detached`].
pub async fn await_next_event<T, S>(subscribe: S) -> Result<T, QueueError>
where
    T: Send + 'static,
    S: FnOnce(Arc<PendingAwait<T>>) -> Unsubscribe,
{
    let (pending, receiver) = PendingAwait::new();
    let unsubscribe = subscribe(Arc::clone(&pending));
    pending.attach_unsubscribe(unsubscribe);
    // From here only the listeners keep the token alive; if they are all
    // dropped without resolving, the receiver wakes with an error below.
    drop(pending);
    match receiver.await {
        Ok(outcome) => outcome,
        Err(_) => Err(QueueError::Detached),
    }
}
