use crate::{
    domain::entities::{transaction::Transaction, verification_response::VerificationResponse},
    errors::ReceiptError,
};

/// Status code meaning the receipt was issued by the test environment and
/// must be resent to the sandbox endpoint.
pub(crate) const STATUS_SANDBOX_RECEIPT: i64 = 21007;

/// Decide protocol-level acceptance of a verification response for one
/// transaction.
///
/// A response is accepted when its status code is 0 and its decoded
/// receipt lists at least one in-app purchase with the transaction's
/// product identifier. A missing `receipt` or `in_app` structure is a
/// validation failure, not a pass.
pub(crate) fn validate(
    transaction: &Transaction,
    response: &VerificationResponse,
) -> Result<(), ReceiptError> {
    if response.status != 0 {
        return Err(ReceiptError::InvalidReceipt {
            code: response.status,
        });
    }

    let in_app = response
        .receipt
        .as_ref()
        .and_then(|receipt| receipt.in_app.as_ref())
        .ok_or(ReceiptError::ProductMismatch)?;

    let contains_product = in_app
        .iter()
        .any(|purchase| purchase.product_id.as_deref() == Some(&transaction.product_identifier));
    if !contains_product {
        return Err(ReceiptError::ProductMismatch);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::transaction::TransactionState;

    fn transaction() -> Transaction {
        Transaction {
            id: "1000000000000001".to_string(),
            product_identifier: "com.app.pro".to_string(),
            state: TransactionState::Purchased,
        }
    }

    fn response(body: serde_json::Value) -> VerificationResponse {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn accepts_matching_product() {
        let response = response(serde_json::json!({
            "status": 0,
            "receipt": {"in_app": [{"product_id": "com.app.pro"}]},
        }));
        assert!(validate(&transaction(), &response).is_ok());
    }

    #[test]
    fn accepts_when_any_entry_matches() {
        let response = response(serde_json::json!({
            "status": 0,
            "receipt": {"in_app": [
                {"product_id": "com.app.other"},
                {"product_id": "com.app.pro", "quantity": "1"},
            ]},
        }));
        assert!(validate(&transaction(), &response).is_ok());
    }

    #[test]
    fn rejects_nonzero_status_with_that_code() {
        let response = response(serde_json::json!({"status": 21003}));
        assert!(matches!(
            validate(&transaction(), &response),
            Err(ReceiptError::InvalidReceipt { code: 21003 })
        ));
    }

    #[test]
    fn rejects_missing_product() {
        let response = response(serde_json::json!({
            "status": 0,
            "receipt": {"in_app": [{"product_id": "com.app.other"}]},
        }));
        assert!(matches!(
            validate(&transaction(), &response),
            Err(ReceiptError::ProductMismatch)
        ));
    }

    #[test]
    fn rejects_missing_receipt_structure() {
        let no_receipt = response(serde_json::json!({"status": 0}));
        assert!(matches!(
            validate(&transaction(), &no_receipt),
            Err(ReceiptError::ProductMismatch)
        ));

        let no_in_app = response(serde_json::json!({"status": 0, "receipt": {}}));
        assert!(matches!(
            validate(&transaction(), &no_in_app),
            Err(ReceiptError::ProductMismatch)
        ));
    }

    #[test]
    fn rejects_entries_without_product_id() {
        let response = response(serde_json::json!({
            "status": 0,
            "receipt": {"in_app": [{"quantity": "1"}]},
        }));
        assert!(matches!(
            validate(&transaction(), &response),
            Err(ReceiptError::ProductMismatch)
        ));
    }
}
