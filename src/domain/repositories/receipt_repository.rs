use async_trait::async_trait;

use crate::{
    domain::entities::{
        environment::Environment, transaction::Transaction,
        verification_response::VerificationResponse,
        verify_receipt_options::VerifyReceiptOptions,
    },
    errors::ReceiptError,
};

#[async_trait]
pub trait ReceiptRepository: Send + Sync {
    /// Verify the installation's receipt for `transaction` against the
    /// remote verification service.
    ///
    /// Verification normally starts against [`Environment::Production`];
    /// when the service reports a sandbox receipt (status 21007), the
    /// call is retried once against the sandbox endpoint before any
    /// failure surfaces. On success the transaction is returned together
    /// with the service's response, uninterpreted beyond the status and
    /// product checks.
    async fn verify_receipt(
        &self,
        transaction: Transaction,
        options: &VerifyReceiptOptions,
        environment: Environment,
    ) -> Result<(Transaction, VerificationResponse), ReceiptError>;
}
