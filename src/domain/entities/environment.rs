/// Verification environment, selected per call.
///
/// Receipts issued by the test environment are rejected by the production
/// endpoint with status code 21007, which triggers the sandbox fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Sandbox,
}

impl Environment {
    /// Fixed `verifyReceipt` endpoint URL for this environment.
    pub fn verify_receipt_url(&self) -> &'static str {
        match self {
            Environment::Production => "https://buy.itunes.apple.com/verifyReceipt",
            Environment::Sandbox => "https://sandbox.itunes.apple.com/verifyReceipt",
        }
    }
}
