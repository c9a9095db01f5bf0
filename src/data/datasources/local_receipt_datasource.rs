use std::path::PathBuf;

use async_trait::async_trait;

use crate::errors::ReceiptError;

#[async_trait]
pub(crate) trait LocalReceiptDatasource: Send + Sync {
    /// Raw receipt blob for the current installation, or `None` when the
    /// installation has no receipt.
    async fn app_store_receipt(&self) -> Result<Option<Vec<u8>>, ReceiptError>;
}

/// Reads the receipt from the installation's receipt file, the location
/// the store writes it to (the app bundle's receipt URL on device).
pub(crate) struct LocalReceiptDatasourceImpl {
    receipt_path: PathBuf,
}

impl LocalReceiptDatasourceImpl {
    pub(crate) fn new(receipt_path: PathBuf) -> Self {
        Self { receipt_path }
    }
}

#[async_trait]
impl LocalReceiptDatasource for LocalReceiptDatasourceImpl {
    async fn app_store_receipt(&self) -> Result<Option<Vec<u8>>, ReceiptError> {
        match tokio::fs::read(&self.receipt_path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
