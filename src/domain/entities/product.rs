/// A purchasable product, identified by its store product identifier.
///
/// Catalog retrieval is the embedding application's concern; the queue
/// only needs the identifier to initiate a payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub product_identifier: String,
}

impl Product {
    pub fn new(product_identifier: impl Into<String>) -> Self {
        Self {
            product_identifier: product_identifier.into(),
        }
    }
}
