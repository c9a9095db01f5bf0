use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use tracing::debug;

use crate::{
    data::models::verify_receipt::verify_receipt_request_model::VerifyReceiptRequestModel,
    domain::entities::{environment::Environment, verification_response::VerificationResponse},
    errors::ReceiptError,
};

#[async_trait]
pub(crate) trait VerifyReceiptDatasource: Send + Sync {
    /// verifyReceipt:
    /// https://developer.apple.com/documentation/appstorereceipts/verifyreceipt
    ///
    /// One round-trip against the given environment's endpoint. No
    /// fallback or retry happens at this layer.
    async fn verify_receipt(
        &self,
        request: &VerifyReceiptRequestModel,
        environment: Environment,
    ) -> Result<VerificationResponse, ReceiptError>;
}

pub(crate) struct VerifyReceiptDatasourceImpl {
    client: reqwest::Client,
}

impl VerifyReceiptDatasourceImpl {
    pub(crate) fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl VerifyReceiptDatasource for VerifyReceiptDatasourceImpl {
    async fn verify_receipt(
        &self,
        request: &VerifyReceiptRequestModel,
        environment: Environment,
    ) -> Result<VerificationResponse, ReceiptError> {
        let url = environment.verify_receipt_url();
        debug!(url, ?environment, "posting receipt for verification");

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            // Verification must always hit the network, never a cache.
            .header(CACHE_CONTROL, "no-cache")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReceiptError::NonHttpResponse {
                status: status.as_u16(),
            });
        }

        Ok(response.json::<VerificationResponse>().await?)
    }
}
