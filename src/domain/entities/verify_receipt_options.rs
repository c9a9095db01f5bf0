/// Per-call options for a receipt verification.
#[derive(Debug, Clone, Default)]
pub struct VerifyReceiptOptions {
    /// When true, the response's latest receipt info excludes old
    /// transactions that have since been superseded.
    pub exclude_old_transactions: bool,
    /// App-specific shared secret; required for auto-renewable
    /// subscription receipts, omitted from the request body when absent.
    pub password: Option<String>,
}
