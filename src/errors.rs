use thiserror::Error;

/// Error supplied by the external payment queue, carried unchanged.
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// Failures of a receipt verification round-trip.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// No local receipt is available to send for verification.
    #[error("no App Store receipt is available for this installation")]
    ReceiptUnavailable,

    /// The verification endpoint answered with a non-2xx HTTP status.
    #[error("verification endpoint returned HTTP status {status}")]
    NonHttpResponse { status: u16 },

    /// The verification service rejected the receipt with a non-zero
    /// status code.
    #[error("receipt rejected by verification service (status code {code})")]
    InvalidReceipt { code: i64 },

    /// The receipt parsed correctly but does not list the transaction's
    /// product identifier among its in-app purchases.
    #[error("receipt does not contain the transaction's product")]
    ProductMismatch,

    /// Any other transport or parsing failure.
    #[error("receipt verification failed")]
    Underlying(#[source] StoreError),
}

impl From<reqwest::Error> for ReceiptError {
    fn from(error: reqwest::Error) -> Self {
        Self::Underlying(Box::new(error))
    }
}

impl From<serde_json::Error> for ReceiptError {
    fn from(error: serde_json::Error) -> Self {
        Self::Underlying(Box::new(error))
    }
}

impl From<std::io::Error> for ReceiptError {
    fn from(error: std::io::Error) -> Self {
        Self::Underlying(Box::new(error))
    }
}

/// Failures of a bridged payment-queue operation.
#[derive(Debug, Error)]
pub enum QueueError {
    /// The queue reported that restoring completed transactions failed.
    /// The queue's own error is the source, unchanged.
    #[error("restoring completed transactions failed")]
    Restore(#[source] StoreError),

    /// The observer was detached before any event was delivered.
    #[error("transaction observer detached before an event was delivered")]
    Detached,
}
