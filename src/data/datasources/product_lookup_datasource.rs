use std::{
    collections::BTreeSet,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use async_trait::async_trait;

use crate::{
    data::models::products_response_model::ProductsResponseModel,
    domain::entities::product_id::ProductId, errors::PurchaseError,
};

#[async_trait]
pub trait ProductLookupDatasource: Send + Sync {
    /// Looks up products in the vendor store catalog.
    ///
    /// product_identifiers:
    ///   The identifiers to look up. Identifiers unknown to the store are
    ///   reported back in `invalid_product_identifiers`, not as an error.
    /// pending:
    ///   Holds the single product request slot. Dropping it allows the next
    ///   request to start, so it must live as long as the vendor request
    ///   does, even if the returned future is dropped first.
    ///
    /// Vendor failures must be returned as `PurchaseError::Store`.
    async fn request_products(
        &self,
        product_identifiers: &BTreeSet<ProductId>,
        pending: PendingRequest,
    ) -> Result<ProductsResponseModel, PurchaseError>;
}

/// Occupies the product request slot until dropped.
#[derive(Debug)]
pub struct PendingRequest {
    in_flight: Arc<AtomicBool>,
}

impl PendingRequest {
    /// Takes the slot, or returns `None` if another request holds it.
    pub(crate) fn acquire(in_flight: &Arc<AtomicBool>) -> Option<Self> {
        in_flight
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| Self {
                in_flight: in_flight.clone(),
            })
    }
}

impl Drop for PendingRequest {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}
