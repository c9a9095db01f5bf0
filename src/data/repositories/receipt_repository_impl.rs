use async_trait::async_trait;
use tracing::{debug, warn};

use crate::{
    data::{
        datasources::{
            local_receipt_datasource::{LocalReceiptDatasource, LocalReceiptDatasourceImpl},
            verify_receipt_datasource::{VerifyReceiptDatasource, VerifyReceiptDatasourceImpl},
        },
        models::verify_receipt::verify_receipt_request_model::VerifyReceiptRequestModel,
        repositories::receipt_validator::{self, STATUS_SANDBOX_RECEIPT},
    },
    domain::{
        entities::{
            environment::Environment, transaction::Transaction,
            verification_response::VerificationResponse,
            verify_receipt_options::VerifyReceiptOptions,
        },
        repositories::receipt_repository::ReceiptRepository,
    },
    errors::ReceiptError,
};

pub(crate) struct ReceiptRepositoryImpl<V: VerifyReceiptDatasource, L: LocalReceiptDatasource> {
    verify_receipt_datasource: V,
    local_receipt_datasource: L,
}

#[async_trait]
impl<V: VerifyReceiptDatasource, L: LocalReceiptDatasource> ReceiptRepository
    for ReceiptRepositoryImpl<V, L>
{
    async fn verify_receipt(
        &self,
        transaction: Transaction,
        options: &VerifyReceiptOptions,
        environment: Environment,
    ) -> Result<(Transaction, VerificationResponse), ReceiptError> {
        let receipt = self
            .local_receipt_datasource
            .app_store_receipt()
            .await?
            .ok_or(ReceiptError::ReceiptUnavailable)?;
        let request = VerifyReceiptRequestModel::new(&receipt, options);

        // Receipts issued by the test environment are rejected by the
        // production endpoint with status 21007; that one rejection is
        // retried against the sandbox endpoint with the identical body.
        // The flag is consumed by the retry, so a sandbox 21007 surfaces
        // instead of looping.
        let mut environment = environment;
        let mut fallback_available = environment == Environment::Production;
        loop {
            let response = self
                .verify_receipt_datasource
                .verify_receipt(&request, environment)
                .await?;
            match receipt_validator::validate(&transaction, &response) {
                Ok(()) => {
                    debug!(
                        transaction_id = %transaction.id,
                        ?environment,
                        "receipt verified"
                    );
                    return Ok((transaction, response));
                }
                Err(ReceiptError::InvalidReceipt {
                    code: STATUS_SANDBOX_RECEIPT,
                }) if fallback_available => {
                    warn!(
                        transaction_id = %transaction.id,
                        "sandbox receipt sent to production, retrying against sandbox"
                    );
                    environment = Environment::Sandbox;
                    fallback_available = false;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl ReceiptRepositoryImpl<VerifyReceiptDatasourceImpl, LocalReceiptDatasourceImpl> {
    pub(crate) fn new(receipt_path: std::path::PathBuf) -> Self {
        Self {
            verify_receipt_datasource: VerifyReceiptDatasourceImpl::new(),
            local_receipt_datasource: LocalReceiptDatasourceImpl::new(receipt_path),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::domain::entities::transaction::TransactionState;

    /// Scripted verification endpoint: pops one canned result per call
    /// and records the environment each call targeted. Clones share the
    /// script so tests can inspect the call log afterwards.
    #[derive(Clone)]
    struct FakeVerifyReceiptDatasource {
        script: std::sync::Arc<Mutex<Vec<Result<serde_json::Value, ReceiptError>>>>,
        calls: std::sync::Arc<Mutex<Vec<Environment>>>,
    }

    impl FakeVerifyReceiptDatasource {
        fn new(script: Vec<Result<serde_json::Value, ReceiptError>>) -> Self {
            Self {
                script: std::sync::Arc::new(Mutex::new(script)),
                calls: std::sync::Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn calls(&self) -> Vec<Environment> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl VerifyReceiptDatasource for FakeVerifyReceiptDatasource {
        async fn verify_receipt(
            &self,
            _request: &VerifyReceiptRequestModel,
            environment: Environment,
        ) -> Result<VerificationResponse, ReceiptError> {
            self.calls.lock().unwrap().push(environment);
            let next = self.script.lock().unwrap().remove(0);
            next.map(|body| serde_json::from_value(body).unwrap())
        }
    }

    struct FakeLocalReceiptDatasource {
        receipt: Option<Vec<u8>>,
    }

    #[async_trait]
    impl LocalReceiptDatasource for FakeLocalReceiptDatasource {
        async fn app_store_receipt(&self) -> Result<Option<Vec<u8>>, ReceiptError> {
            Ok(self.receipt.clone())
        }
    }

    fn transaction() -> Transaction {
        Transaction {
            id: "1000000000000001".to_string(),
            product_identifier: "com.app.pro".to_string(),
            state: TransactionState::Purchased,
        }
    }

    fn repository(
        endpoint: &FakeVerifyReceiptDatasource,
        receipt: Option<Vec<u8>>,
    ) -> ReceiptRepositoryImpl<FakeVerifyReceiptDatasource, FakeLocalReceiptDatasource> {
        ReceiptRepositoryImpl {
            verify_receipt_datasource: endpoint.clone(),
            local_receipt_datasource: FakeLocalReceiptDatasource { receipt },
        }
    }

    fn accepted_body() -> serde_json::Value {
        serde_json::json!({
            "status": 0,
            "receipt": {"in_app": [{"product_id": "com.app.pro"}]},
        })
    }

    #[tokio::test]
    async fn verifies_against_production() {
        let endpoint = FakeVerifyReceiptDatasource::new(vec![Ok(accepted_body())]);
        let repository = repository(&endpoint, Some(b"receipt".to_vec()));

        let (transaction, response) = repository
            .verify_receipt(
                transaction(),
                &VerifyReceiptOptions::default(),
                Environment::Production,
            )
            .await
            .unwrap();

        assert_eq!(transaction.product_identifier, "com.app.pro");
        assert_eq!(response.status, 0);
        assert_eq!(endpoint.calls(), vec![Environment::Production]);
    }

    #[tokio::test]
    async fn missing_receipt_fails_without_calling_out() {
        let endpoint = FakeVerifyReceiptDatasource::new(vec![]);
        let repository = repository(&endpoint, None);

        let error = repository
            .verify_receipt(
                transaction(),
                &VerifyReceiptOptions::default(),
                Environment::Production,
            )
            .await
            .unwrap_err();

        assert!(matches!(error, ReceiptError::ReceiptUnavailable));
        assert!(endpoint.calls().is_empty());
    }

    #[tokio::test]
    async fn sandbox_receipt_on_production_retries_sandbox_once() {
        let endpoint = FakeVerifyReceiptDatasource::new(vec![
            Ok(serde_json::json!({"status": 21007})),
            Ok(accepted_body()),
        ]);
        let repository = repository(&endpoint, Some(b"receipt".to_vec()));

        let (_, response) = repository
            .verify_receipt(
                transaction(),
                &VerifyReceiptOptions::default(),
                Environment::Production,
            )
            .await
            .unwrap();

        assert_eq!(response.status, 0);
        assert_eq!(
            endpoint.calls(),
            vec![Environment::Production, Environment::Sandbox]
        );
    }

    #[tokio::test]
    async fn sandbox_21007_surfaces_after_exactly_two_calls() {
        let endpoint = FakeVerifyReceiptDatasource::new(vec![
            Ok(serde_json::json!({"status": 21007})),
            Ok(serde_json::json!({"status": 21007})),
        ]);
        let repository = repository(&endpoint, Some(b"receipt".to_vec()));

        let error = repository
            .verify_receipt(
                transaction(),
                &VerifyReceiptOptions::default(),
                Environment::Production,
            )
            .await
            .unwrap_err();

        assert!(matches!(error, ReceiptError::InvalidReceipt { code: 21007 }));
        assert_eq!(
            endpoint.calls(),
            vec![Environment::Production, Environment::Sandbox]
        );
    }

    #[tokio::test]
    async fn other_rejections_fail_without_retry() {
        let endpoint =
            FakeVerifyReceiptDatasource::new(vec![Ok(serde_json::json!({"status": 21003}))]);
        let repository = repository(&endpoint, Some(b"receipt".to_vec()));

        let error = repository
            .verify_receipt(
                transaction(),
                &VerifyReceiptOptions::default(),
                Environment::Production,
            )
            .await
            .unwrap_err();

        assert!(matches!(error, ReceiptError::InvalidReceipt { code: 21003 }));
        assert_eq!(endpoint.calls(), vec![Environment::Production]);
    }

    #[tokio::test]
    async fn product_mismatch_fails_without_retry() {
        let endpoint = FakeVerifyReceiptDatasource::new(vec![Ok(serde_json::json!({
            "status": 0,
            "receipt": {"in_app": [{"product_id": "com.app.other"}]},
        }))]);
        let repository = repository(&endpoint, Some(b"receipt".to_vec()));

        let error = repository
            .verify_receipt(
                transaction(),
                &VerifyReceiptOptions::default(),
                Environment::Production,
            )
            .await
            .unwrap_err();

        assert!(matches!(error, ReceiptError::ProductMismatch));
        assert_eq!(endpoint.calls(), vec![Environment::Production]);
    }

    #[tokio::test]
    async fn transport_failures_pass_through() {
        let endpoint = FakeVerifyReceiptDatasource::new(vec![Err(
            ReceiptError::NonHttpResponse { status: 500 },
        )]);
        let repository = repository(&endpoint, Some(b"receipt".to_vec()));

        let error = repository
            .verify_receipt(
                transaction(),
                &VerifyReceiptOptions::default(),
                Environment::Production,
            )
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            ReceiptError::NonHttpResponse { status: 500 }
        ));
        assert_eq!(endpoint.calls(), vec![Environment::Production]);
    }

    #[tokio::test]
    async fn sandbox_entry_never_falls_back() {
        let endpoint =
            FakeVerifyReceiptDatasource::new(vec![Ok(serde_json::json!({"status": 21007}))]);
        let repository = repository(&endpoint, Some(b"receipt".to_vec()));

        let error = repository
            .verify_receipt(
                transaction(),
                &VerifyReceiptOptions::default(),
                Environment::Sandbox,
            )
            .await
            .unwrap_err();

        assert!(matches!(error, ReceiptError::InvalidReceipt { code: 21007 }));
        assert_eq!(endpoint.calls(), vec![Environment::Sandbox]);
    }
}
