use serde::Deserialize;
use serde_json::{Map, Value};

/// Data structure returned by the `verifyReceipt` endpoint.
///
/// https://developer.apple.com/documentation/appstorereceipts/responsebody
///
/// Only the fields the validator inspects are typed; everything else the
/// service returns is preserved untouched in the flattened `extra` maps,
/// since the response is handed back to the caller uninterpreted.
#[derive(Debug, Clone, Deserialize)]
pub struct VerificationResponse {
    /// 0 on success; any other value is a rejection. 21007 means the
    /// receipt was issued by the test environment and must be resent to
    /// the sandbox endpoint.
    pub status: i64,
    pub receipt: Option<ReceiptInfo>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Decoded receipt enclosed in a verification response.
#[derive(Debug, Clone, Deserialize)]
pub struct ReceiptInfo {
    /// In-app purchase receipts, in ascending order of purchase date.
    pub in_app: Option<Vec<InAppPurchase>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One in-app purchase entry of a decoded receipt.
#[derive(Debug, Clone, Deserialize)]
pub struct InAppPurchase {
    pub product_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
