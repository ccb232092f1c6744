use crate::{
    config::PurchaseConfig,
    data::{
        datasources::{
            payment_queue_datasource::PaymentQueueDatasource,
            product_lookup_datasource::ProductLookupDatasource,
        },
        repositories::purchase_repository_impl::PurchaseRepositoryImpl,
    },
    domain::{entities::product::Product, repositories::purchase_repository::PurchaseRepository},
    errors::PurchaseError,
};

pub struct PurchaseUtil<R: PurchaseRepository> {
    purchase_repository: R,
}

impl<R: PurchaseRepository> PurchaseUtil<R> {
    /// Fetches the configured products from the store.
    ///
    /// Identifiers the store does not know are skipped. Fails with
    /// `AnotherRequestInProgress` while a previous call is still waiting on
    /// the store.
    pub async fn list_products(&self) -> Result<Vec<Product>, PurchaseError> {
        self.purchase_repository.list_products().await
    }

    /// Hands a purchase of `product` to the store's payment queue. The outcome
    /// of the transaction is reported by the store, not by this call.
    pub fn purchase(&self, product: &Product) -> Result<(), PurchaseError> {
        self.purchase_repository.purchase(product)
    }
}

impl<L: ProductLookupDatasource, Q: PaymentQueueDatasource>
    PurchaseUtil<PurchaseRepositoryImpl<L, Q>>
{
    pub fn new(
        product_identifiers: impl IntoIterator<Item = impl Into<String>>,
        product_lookup_datasource: L,
        payment_queue_datasource: Q,
    ) -> Self {
        Self {
            purchase_repository: PurchaseRepositoryImpl::new(
                product_identifiers.into_iter().map(Into::<String>::into),
                product_lookup_datasource,
                payment_queue_datasource,
            ),
        }
    }

    pub fn from_config(
        config: PurchaseConfig,
        product_lookup_datasource: L,
        payment_queue_datasource: Q,
    ) -> Self {
        Self::new(
            config.product_identifiers,
            product_lookup_datasource,
            payment_queue_datasource,
        )
    }
}
