use std::sync::Arc;

use crate::{
    domain::entities::{product::Product, transaction::Transaction},
    errors::StoreError,
};

/// Handle identifying one observer registration on a [`TransactionQueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub u64);

/// The platform payment queue, implemented by the embedding application.
///
/// The queue is a single shared broadcast source: every registered
/// observer sees every event, and registrations are added and removed
/// independently of each other.
pub trait TransactionQueue: Send + Sync {
    /// Register an observer. The observer may be invoked from an
    /// arbitrary thread.
    fn add_observer(&self, observer: Arc<dyn TransactionObserver>) -> ObserverId;

    /// Remove a previously registered observer. Removing an unknown id is
    /// a no-op.
    fn remove_observer(&self, id: ObserverId);

    /// Ask the store to replay the user's completed transactions. The
    /// outcome arrives as a `restore_finished` or `restore_failed` event.
    fn restore_completed_transactions(&self);

    /// Start a payment for `product`. Resulting transactions arrive as
    /// `updated_transactions` events.
    fn add_payment(&self, product: &Product);
}

/// Callbacks delivered by a [`TransactionQueue`]. All methods default to
/// no-ops so observers implement only the events they care about.
pub trait TransactionObserver: Send + Sync {
    /// One or more transactions changed state.
    fn updated_transactions(&self, _transactions: &[Transaction]) {}

    /// A restore request completed; `transactions` is the queue's
    /// transaction list at completion time.
    fn restore_finished(&self, _transactions: &[Transaction]) {}

    /// A restore request failed with the store's error.
    fn restore_failed(&self, _error: StoreError) {}
}
