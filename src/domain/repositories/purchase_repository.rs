use async_trait::async_trait;

use crate::{domain::entities::product::Product, errors::PurchaseError};

#[async_trait]
pub trait PurchaseRepository: Send + Sync {
    /// Fetches the configured products from the store. Only one request may be
    /// in flight at a time; concurrent calls fail with
    /// `PurchaseError::AnotherRequestInProgress`.
    async fn list_products(&self) -> Result<Vec<Product>, PurchaseError>;

    /// Submits a purchase of `product` to the payment queue. `Ok` means the
    /// payment was handed to the queue, not that the purchase succeeded.
    fn purchase(&self, product: &Product) -> Result<(), PurchaseError>;
}
