use std::{
    collections::BTreeSet,
    sync::{atomic::AtomicBool, Arc},
};

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::{
    data::{
        datasources::{
            payment_queue_datasource::PaymentQueueDatasource,
            product_lookup_datasource::{PendingRequest, ProductLookupDatasource},
        },
        models::{
            payment_model::PaymentModel,
            products_response_model::{ProductModel, ProductsResponseModel},
        },
    },
    domain::{
        entities::{product::Product, product_id::ProductId},
        repositories::purchase_repository::PurchaseRepository,
    },
    errors::PurchaseError,
};

pub struct PurchaseRepositoryImpl<L: ProductLookupDatasource, Q: PaymentQueueDatasource> {
    product_lookup_datasource: L,
    payment_queue_datasource: Q,
    product_identifiers: BTreeSet<ProductId>,
    request_in_flight: Arc<AtomicBool>,
}

#[async_trait]
impl<L: ProductLookupDatasource, Q: PaymentQueueDatasource> PurchaseRepository
    for PurchaseRepositoryImpl<L, Q>
{
    async fn list_products(&self) -> Result<Vec<Product>, PurchaseError> {
        // The slot is handed to the datasource, which releases it once the
        // vendor request is over.
        let Some(pending) = PendingRequest::acquire(&self.request_in_flight) else {
            warn!("rejected product request, another request is in progress");
            return Err(PurchaseError::AnotherRequestInProgress);
        };
        debug!(
            count = self.product_identifiers.len(),
            "requesting products from store"
        );
        let products = match self
            .product_lookup_datasource
            .request_products(&self.product_identifiers, pending)
            .await
        {
            Ok(response) => Ok(Product::from_products_response(response)),
            Err(e) => {
                error!(error = %e, "failed product request");
                Err(e)
            }
        };
        info!("product request finished");
        products
    }

    fn purchase(&self, product: &Product) -> Result<(), PurchaseError> {
        if !self.payment_queue_datasource.can_make_payments() {
            warn!(sku = product.sku(), "payment queue cannot make purchases");
            return Err(PurchaseError::CannotMakePurchase);
        }
        self.payment_queue_datasource
            .add_payment(PaymentModel::for_product(product.sku()));
        info!(sku = product.sku(), "submitted purchase to payment queue");
        Ok(())
    }
}

impl<L: ProductLookupDatasource, Q: PaymentQueueDatasource> PurchaseRepositoryImpl<L, Q> {
    pub fn new(
        product_identifiers: impl IntoIterator<Item = impl Into<ProductId>>,
        product_lookup_datasource: L,
        payment_queue_datasource: Q,
    ) -> Self {
        Self {
            product_lookup_datasource,
            payment_queue_datasource,
            product_identifiers: product_identifiers.into_iter().map(Into::into).collect(),
            request_in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn product_identifiers(&self) -> &BTreeSet<ProductId> {
        &self.product_identifiers
    }
}

impl Product {
    fn from_products_response(response: ProductsResponseModel) -> Vec<Self> {
        let ProductsResponseModel {
            products,
            invalid_product_identifiers,
        } = response;
        if products.is_empty() {
            info!("didn't find any available purchases");
        } else {
            info!("found {} available purchases", products.len());
        }
        if !invalid_product_identifiers.is_empty() {
            info!(
                identifiers = ?invalid_product_identifiers,
                "found {} unavailable purchases",
                invalid_product_identifiers.len()
            );
        }
        products.into_iter().map(Self::from_product_model).collect()
    }

    fn from_product_model(m: ProductModel) -> Self {
        Product::new(
            ProductId(m.product_identifier),
            m.localized_title,
            m.localized_description,
            m.price,
            m.price_locale,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::VecDeque,
        sync::{Arc, Mutex},
    };

    use rust_decimal::Decimal;
    use tokio::sync::Notify;
    use tracing_test::traced_test;

    use super::*;
    use crate::{
        data::datasources::product_request_bridge::{
            CallbackProductLookupDatasource, ProductRequestDelegate, ProductRequestStarter,
        },
        errors::StoreError,
    };

    #[derive(Default)]
    struct StubLookup {
        responses: Mutex<VecDeque<Result<ProductsResponseModel, PurchaseError>>>,
        requested: Mutex<Vec<BTreeSet<ProductId>>>,
        hold_first_request: bool,
        started: Notify,
        release: Notify,
    }

    impl StubLookup {
        fn replying(
            responses: impl IntoIterator<Item = Result<ProductsResponseModel, PurchaseError>>,
        ) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().collect()),
                ..Default::default()
            }
        }

        fn holding_first(
            responses: impl IntoIterator<Item = Result<ProductsResponseModel, PurchaseError>>,
        ) -> Self {
            Self {
                hold_first_request: true,
                ..Self::replying(responses)
            }
        }
    }

    #[async_trait]
    impl ProductLookupDatasource for StubLookup {
        async fn request_products(
            &self,
            product_identifiers: &BTreeSet<ProductId>,
            _pending: PendingRequest,
        ) -> Result<ProductsResponseModel, PurchaseError> {
            let first = {
                let mut requested = self.requested.lock().unwrap();
                requested.push(product_identifiers.clone());
                requested.len() == 1
            };
            if first && self.hold_first_request {
                self.started.notify_one();
                self.release.notified().await;
            }
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected product request")
        }
    }

    struct StubPaymentQueue {
        can_make_payments: bool,
        payments: Mutex<Vec<PaymentModel>>,
    }

    impl StubPaymentQueue {
        fn new(can_make_payments: bool) -> Self {
            Self {
                can_make_payments,
                payments: Mutex::new(vec![]),
            }
        }
    }

    impl PaymentQueueDatasource for StubPaymentQueue {
        fn can_make_payments(&self) -> bool {
            self.can_make_payments
        }

        fn add_payment(&self, payment: PaymentModel) {
            self.payments.lock().unwrap().push(payment);
        }
    }

    const IDENTIFIERS: [&str; 3] = ["tip.small", "tip.medium", "tip.large"];

    fn repository(
        lookup: StubLookup,
        can_make_payments: bool,
    ) -> PurchaseRepositoryImpl<StubLookup, StubPaymentQueue> {
        PurchaseRepositoryImpl::new(IDENTIFIERS, lookup, StubPaymentQueue::new(can_make_payments))
    }

    fn product_model(sku: &str) -> ProductModel {
        ProductModel {
            product_identifier: sku.to_owned(),
            localized_title: format!("Title of {sku}"),
            localized_description: String::new(),
            price: Decimal::new(99, 2),
            price_locale: "en_US@currency=USD".to_owned(),
        }
    }

    fn response(valid: &[&str], invalid: &[&str]) -> ProductsResponseModel {
        ProductsResponseModel {
            products: valid.iter().map(|sku| product_model(sku)).collect(),
            invalid_product_identifiers: invalid.iter().map(|sku| sku.to_string()).collect(),
        }
    }

    fn small_tip() -> Product {
        Product::from_product_model(product_model("tip.small"))
    }

    #[test]
    fn deduplicates_product_identifiers() {
        let repository = PurchaseRepositoryImpl::new(
            ["tip.small", "tip.large", "tip.small"],
            StubLookup::default(),
            StubPaymentQueue::new(true),
        );
        assert_eq!(
            repository.product_identifiers(),
            &BTreeSet::from([ProductId::from("tip.large"), ProductId::from("tip.small")])
        );
    }

    #[tokio::test]
    async fn rejects_second_request_while_first_is_pending() {
        let repository = Arc::new(repository(
            StubLookup::holding_first([Ok(response(&["tip.small"], &[]))]),
            true,
        ));
        let first = {
            let repository = repository.clone();
            tokio::spawn(async move { repository.list_products().await })
        };
        repository.product_lookup_datasource.started.notified().await;

        assert_eq!(
            repository.list_products().await,
            Err(PurchaseError::AnotherRequestInProgress)
        );

        repository.product_lookup_datasource.release.notify_one();
        let products = first.await.unwrap().unwrap();
        assert_eq!(products.len(), 1);

        let requested = repository.product_lookup_datasource.requested.lock().unwrap();
        assert_eq!(requested.len(), 1);
        assert_eq!(
            requested[0],
            IDENTIFIERS.into_iter().map(ProductId::from).collect::<BTreeSet<_>>()
        );
    }

    #[tokio::test]
    #[traced_test]
    async fn returns_one_product_per_valid_identifier() {
        let repository = repository(
            StubLookup::replying([Ok(response(
                &["tip.small", "tip.large"],
                &["tip.medium", "tip.retired", "tip.old"],
            ))]),
            true,
        );
        let products = repository.list_products().await.unwrap();
        assert_eq!(
            products.iter().map(Product::sku).collect::<Vec<_>>(),
            ["tip.small", "tip.large"]
        );
        assert_eq!(products[0].localized_title(), "Title of tip.small");
        assert_eq!(products[0].localized_price().unwrap(), "$0.99");
        assert!(logs_contain("found 2 available purchases"));
        assert!(logs_contain("found 3 unavailable purchases"));
        assert!(logs_contain("product request finished"));
    }

    #[tokio::test]
    #[traced_test]
    async fn no_valid_products_is_an_empty_success() {
        let repository = repository(
            StubLookup::replying([Ok(response(&[], &IDENTIFIERS))]),
            true,
        );
        assert_eq!(repository.list_products().await, Ok(vec![]));
        assert!(logs_contain("didn't find any available purchases"));
        assert!(logs_contain("found 3 unavailable purchases"));
    }

    #[tokio::test]
    #[traced_test]
    async fn passes_vendor_error_through() {
        let error = StoreError::new("SKErrorDomain", 0, "Cannot connect to iTunes Store");
        let repository = repository(
            StubLookup::replying([Err(PurchaseError::Store(error.clone()))]),
            true,
        );
        assert_eq!(
            repository.list_products().await,
            Err(PurchaseError::Store(error))
        );
        assert!(logs_contain("failed product request"));
        assert!(logs_contain("product request finished"));
    }

    #[tokio::test]
    async fn accepts_new_request_after_each_outcome() {
        let repository = repository(
            StubLookup::replying([
                Ok(response(&["tip.small"], &[])),
                Err(PurchaseError::Store(StoreError::new("SKErrorDomain", 2, "cancelled"))),
                Ok(response(&[], &[])),
            ]),
            true,
        );
        assert!(repository.list_products().await.is_ok());
        assert!(repository.list_products().await.is_err());
        assert_eq!(repository.list_products().await, Ok(vec![]));
    }

    /// Keeps every delegate it is handed until the test answers it.
    #[derive(Default)]
    struct HoldingStarter {
        delegates: Arc<Mutex<Vec<ProductRequestDelegate>>>,
    }

    impl ProductRequestStarter for HoldingStarter {
        fn start(&self, _: &BTreeSet<ProductId>, delegate: ProductRequestDelegate) {
            self.delegates.lock().unwrap().push(delegate);
        }
    }

    #[tokio::test]
    async fn abandoned_lookup_keeps_slot_until_store_answers() {
        let starter = HoldingStarter::default();
        let delegates = starter.delegates.clone();
        let repository = Arc::new(PurchaseRepositoryImpl::new(
            IDENTIFIERS,
            CallbackProductLookupDatasource::new(starter),
            StubPaymentQueue::new(true),
        ));

        let first = {
            let repository = repository.clone();
            tokio::spawn(async move { repository.list_products().await })
        };
        while delegates.lock().unwrap().is_empty() {
            tokio::task::yield_now().await;
        }
        first.abort();
        assert!(first.await.unwrap_err().is_cancelled());

        // The store still owns the first request.
        assert_eq!(
            repository.list_products().await,
            Err(PurchaseError::AnotherRequestInProgress)
        );
        assert_eq!(delegates.lock().unwrap().len(), 1);

        let delegate = delegates.lock().unwrap().remove(0);
        delegate.did_receive(response(&["tip.small"], &[]));
        delegate.did_finish();

        let second = {
            let repository = repository.clone();
            tokio::spawn(async move { repository.list_products().await })
        };
        let delegate = loop {
            if let Some(delegate) = delegates.lock().unwrap().pop() {
                break delegate;
            }
            tokio::task::yield_now().await;
        };
        delegate.did_receive(response(&["tip.small"], &["tip.large"]));
        assert_eq!(second.await.unwrap().unwrap().len(), 1);
    }

    #[test]
    fn purchase_is_rejected_when_queue_cannot_make_payments() {
        let repository = repository(StubLookup::default(), false);
        assert_eq!(
            repository.purchase(&small_tip()),
            Err(PurchaseError::CannotMakePurchase)
        );
        assert!(repository.payment_queue_datasource.payments.lock().unwrap().is_empty());
    }

    #[test]
    fn purchase_submits_payment_to_queue() {
        let repository = repository(StubLookup::default(), true);
        assert_eq!(repository.purchase(&small_tip()), Ok(()));
        assert_eq!(repository.purchase(&small_tip()), Ok(()));
        assert_eq!(
            *repository.payment_queue_datasource.payments.lock().unwrap(),
            vec![PaymentModel::for_product("tip.small"); 2]
        );
    }
}
