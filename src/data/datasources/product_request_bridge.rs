use std::{
    collections::BTreeSet,
    sync::{Arc, Mutex, PoisonError},
};

use async_trait::async_trait;
use tokio::sync::oneshot;
use tracing::{debug, error};

use crate::{
    data::models::products_response_model::ProductsResponseModel,
    domain::entities::product_id::ProductId,
    errors::{PurchaseError, StoreError},
};

use super::product_lookup_datasource::{PendingRequest, ProductLookupDatasource};

type ProductRequestResult = Result<ProductsResponseModel, StoreError>;

/// Starts product requests on a vendor framework that reports results through
/// delegate callbacks rather than returning them.
pub trait ProductRequestStarter: Send + Sync {
    /// Starts a request for `product_identifiers`. The vendor must report back
    /// on `delegate` with exactly one of `did_receive` or `did_fail`, usually
    /// followed by `did_finish`. Callbacks may arrive on any thread.
    fn start(&self, product_identifiers: &BTreeSet<ProductId>, delegate: ProductRequestDelegate);
}

#[derive(Debug)]
struct PendingCompletion {
    // Declared first so it drops before `sender`: the slot must be free by
    // the time the waiting lookup observes the outcome.
    pending: PendingRequest,
    sender: oneshot::Sender<ProductRequestResult>,
}

/// Receives the vendor callbacks for a single product request and forwards
/// the first terminal one to the waiting lookup.
///
/// The product request slot stays occupied until a terminal callback arrives
/// or every copy of the delegate is dropped, even if the lookup that started
/// the request is no longer waiting.
#[derive(Debug, Clone)]
pub struct ProductRequestDelegate {
    completion: Arc<Mutex<Option<PendingCompletion>>>,
}

impl ProductRequestDelegate {
    fn channel(pending: PendingRequest) -> (Self, oneshot::Receiver<ProductRequestResult>) {
        let (sender, receiver) = oneshot::channel();
        (
            Self {
                completion: Arc::new(Mutex::new(Some(PendingCompletion { pending, sender }))),
            },
            receiver,
        )
    }

    pub fn did_receive(&self, response: ProductsResponseModel) {
        self.complete(Ok(response));
    }

    pub fn did_fail(&self, error: StoreError) {
        self.complete(Err(error));
    }

    pub fn did_finish(&self) {
        debug!("store reported product request finished");
    }

    fn complete(&self, result: ProductRequestResult) {
        let completion = self
            .completion
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match completion {
            Some(PendingCompletion { pending, sender }) => {
                drop(pending);
                if sender.send(result).is_err() {
                    debug!("product request completed after the caller stopped waiting");
                }
            }
            None => {
                // The vendor answered the same request twice.
                error!("product request callback fired with no pending completion");
                debug_assert!(
                    false,
                    "product request callback fired with no pending completion"
                );
            }
        }
    }
}

/// Adapts a delegate-style vendor framework to [`ProductLookupDatasource`].
pub struct CallbackProductLookupDatasource<S: ProductRequestStarter> {
    starter: S,
}

impl<S: ProductRequestStarter> CallbackProductLookupDatasource<S> {
    pub fn new(starter: S) -> Self {
        Self { starter }
    }
}

#[async_trait]
impl<S: ProductRequestStarter> ProductLookupDatasource for CallbackProductLookupDatasource<S> {
    async fn request_products(
        &self,
        product_identifiers: &BTreeSet<ProductId>,
        pending: PendingRequest,
    ) -> Result<ProductsResponseModel, PurchaseError> {
        let (delegate, response) = ProductRequestDelegate::channel(pending);
        self.starter.start(product_identifiers, delegate);
        // The sender only disappears without a value when every copy of the
        // delegate was dropped unanswered.
        Ok(response
            .await
            .map_err(|_| PurchaseError::RequestAbandoned)??)
    }
}
