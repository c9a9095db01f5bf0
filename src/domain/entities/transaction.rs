/// A record of a purchase or restore action observed on the payment queue.
///
/// Transactions are owned by the external queue; this crate only reads
/// them. Identity is the `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub id: String,
    pub product_identifier: String,
    pub state: TransactionState,
}

/// Lifecycle state of a payment-queue transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Purchasing,
    Purchased,
    Failed,
    Restored,
    Deferred,
}
