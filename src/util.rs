use std::{path::PathBuf, sync::Arc};

use crate::{
    data::{
        datasources::{
            local_receipt_datasource::LocalReceiptDatasourceImpl,
            verify_receipt_datasource::VerifyReceiptDatasourceImpl,
        },
        repositories::receipt_repository_impl::ReceiptRepositoryImpl,
    },
    domain::{
        entities::{
            environment::Environment, product::Product, transaction::Transaction,
            verification_response::VerificationResponse,
            verify_receipt_options::VerifyReceiptOptions,
        },
        queue::{
            observer_bridge,
            pending_await::PendingAwait,
            transaction_queue::{TransactionObserver, TransactionQueue},
        },
        repositories::receipt_repository::ReceiptRepository,
    },
    errors::{QueueError, ReceiptError, StoreError},
};

/// Awaitable client over a platform payment queue.
///
/// Purchase and restore turn the queue's callback events into single-shot
/// results; receipt verification goes through the verification service
/// with the sandbox fallback applied.
pub struct StoreClient<Q: TransactionQueue + 'static, R: ReceiptRepository> {
    queue: Arc<Q>,
    receipt_repository: R,
}

/// Ephemeral observer for one purchase call.
struct PurchaseObserver {
    pending: Arc<PendingAwait<Vec<Transaction>>>,
}

impl TransactionObserver for PurchaseObserver {
    fn updated_transactions(&self, transactions: &[Transaction]) {
        self.pending.resolve(transactions.to_vec());
    }
}

/// Ephemeral observer for one restore call.
struct RestoreObserver {
    pending: Arc<PendingAwait<Vec<Transaction>>>,
}

impl TransactionObserver for RestoreObserver {
    fn restore_finished(&self, transactions: &[Transaction]) {
        self.pending.resolve(transactions.to_vec());
    }

    fn restore_failed(&self, error: StoreError) {
        self.pending.reject(QueueError::Restore(error));
    }
}

impl<Q: TransactionQueue + 'static, R: ReceiptRepository> StoreClient<Q, R> {
    /// Start a payment for `product` and await the next
    /// updated-transactions event.
    ///
    /// The queue broadcasts every state change, so the resolved batch is
    /// the next one delivered, not necessarily transactions for this
    /// product; callers running concurrent purchase or restore activity
    /// must inspect the batch.
    pub async fn purchase(&self, product: &Product) -> Result<Vec<Transaction>, QueueError> {
        let queue = Arc::clone(&self.queue);
        let product = product.clone();
        observer_bridge::await_next_event(move |pending| {
            let id = queue.add_observer(Arc::new(PurchaseObserver { pending }));
            queue.add_payment(&product);
            Box::new(move || queue.remove_observer(id))
        })
        .await
    }

    /// Replay the user's completed transactions and await the outcome.
    ///
    /// Resolves with the queue's transaction list once the restore
    /// finishes, or fails with the store's error unchanged.
    pub async fn restore_completed_transactions(&self) -> Result<Vec<Transaction>, QueueError> {
        let queue = Arc::clone(&self.queue);
        observer_bridge::await_next_event(move |pending| {
            let id = queue.add_observer(Arc::new(RestoreObserver { pending }));
            queue.restore_completed_transactions();
            Box::new(move || queue.remove_observer(id))
        })
        .await
    }

    /// Verify the installation's receipt for `transaction`; see
    /// [`ReceiptRepository::verify_receipt`].
    pub async fn verify_receipt(
        &self,
        transaction: Transaction,
        options: &VerifyReceiptOptions,
        environment: Environment,
    ) -> Result<(Transaction, VerificationResponse), ReceiptError> {
        self.receipt_repository
            .verify_receipt(transaction, options, environment)
            .await
    }

    /// Build a client with an explicit repository, for callers that
    /// substitute the verification backend.
    pub fn with_repository(queue: Arc<Q>, receipt_repository: R) -> Self {
        Self {
            queue,
            receipt_repository,
        }
    }
}

impl<Q: TransactionQueue + 'static>
    StoreClient<Q, ReceiptRepositoryImpl<VerifyReceiptDatasourceImpl, LocalReceiptDatasourceImpl>>
{
    /// Build a client verifying against the App Store endpoints, reading
    /// the receipt from `receipt_path`.
    pub fn new(queue: Arc<Q>, receipt_path: PathBuf) -> Self {
        Self {
            queue,
            receipt_repository: ReceiptRepositoryImpl::new(receipt_path),
        }
    }
}
