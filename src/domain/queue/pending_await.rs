//! Correlation token bridging one queue event into one awaited result.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::oneshot;
use tracing::debug;

use crate::errors::QueueError;

/// Handle that detaches the listener(s) a bridged call registered.
pub type Unsubscribe = Box<dyn FnOnce() + Send>;

struct Slot<T> {
    sender: Option<oneshot::Sender<Result<T, QueueError>>>,
    unsubscribe: Option<Unsubscribe>,
}

/// A single-resolution slot shared with the listener(s) of one bridged
/// call.
///
/// The sender slot and the unsubscribe handle live under one mutex, so the
/// winning resolution consumes both in a single critical section: later
/// events find an empty slot and are no-ops, and the listener is detached
/// synchronously with the resolution rather than when the awaiting task
/// next runs. Resolution is safe from any thread.
pub struct PendingAwait<T> {
    slot: Mutex<Slot<T>>,
}

impl<T: Send + 'static> PendingAwait<T> {
    /// Create a token plus the receiver the bridged call awaits.
    pub(crate) fn new() -> (Arc<Self>, oneshot::Receiver<Result<T, QueueError>>) {
        let (sender, receiver) = oneshot::channel();
        let pending = Arc::new(Self {
            slot: Mutex::new(Slot {
                sender: Some(sender),
                unsubscribe: None,
            }),
        });
        (pending, receiver)
    }

    /// Resolve with a success value. Returns whether this call won the
    /// slot; losing calls have no effect.
    pub fn resolve(&self, value: T) -> bool {
        self.finish(Ok(value))
    }

    /// Resolve with a failure. Same single-resolution contract as
    /// [`resolve`](Self::resolve).
    pub fn reject(&self, error: QueueError) -> bool {
        self.finish(Err(error))
    }

    fn finish(&self, outcome: Result<T, QueueError>) -> bool {
        let (sender, unsubscribe) = {
            let mut slot = self.lock();
            match slot.sender.take() {
                Some(sender) => (sender, slot.unsubscribe.take()),
                None => {
                    debug!("event arrived after resolution, ignoring");
                    return false;
                }
            }
        };
        if let Some(unsubscribe) = unsubscribe {
            unsubscribe();
        }
        // The receiver can only be gone if the awaiting task was dropped;
        // the event is discarded either way.
        let _ = sender.send(outcome);
        true
    }

    /// Attach the unsubscribe handle returned by the subscribe closure.
    /// If an event already won the slot while subscribing, the handle is
    /// invoked immediately instead of stored.
    pub(crate) fn attach_unsubscribe(&self, unsubscribe: Unsubscribe) {
        let already_resolved = {
            let mut slot = self.lock();
            if slot.sender.is_some() {
                slot.unsubscribe = Some(unsubscribe);
                None
            } else {
                Some(unsubscribe)
            }
        };
        if let Some(unsubscribe) = already_resolved {
            unsubscribe();
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Slot<T>> {
        // A listener that panicked mid-callback must not wedge the slot.
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
