use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Serialize;

use crate::domain::entities::verify_receipt_options::VerifyReceiptOptions;

/// Request body sent to the `verifyReceipt` endpoint.
///
/// https://developer.apple.com/documentation/appstorereceipts/requestbody
///
/// Built fresh per verification attempt and never persisted. The same
/// body is reused verbatim for the sandbox fallback call.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct VerifyReceiptRequestModel {
    /// The base64-encoded receipt blob.
    #[serde(rename = "receipt-data")]
    pub(crate) receipt_data: String,
    #[serde(rename = "exclude-old-transactions")]
    pub(crate) exclude_old_transactions: bool,
    /// App-specific shared secret; the key is omitted entirely when no
    /// password is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) password: Option<String>,
}

impl VerifyReceiptRequestModel {
    pub(crate) fn new(receipt: &[u8], options: &VerifyReceiptOptions) -> Self {
        Self {
            receipt_data: BASE64.encode(receipt),
            exclude_old_transactions: options.exclude_old_transactions,
            password: options.password.clone(),
        }
    }
}
