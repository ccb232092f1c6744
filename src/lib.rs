pub(crate) mod data {
    pub(crate) mod datasources {
        pub(crate) mod payment_queue_datasource;
        pub(crate) mod product_lookup_datasource;
        pub(crate) mod product_request_bridge;
    }
    pub(crate) mod models {
        pub(crate) mod payment_model;
        pub(crate) mod products_response_model;
    }
    pub(crate) mod repositories {
        pub(crate) mod purchase_repository_impl;
    }
}

pub mod domain {
    pub mod entities {
        pub mod price_locale;
        pub mod product;
        pub mod product_id;
    }
    pub mod repositories {
        pub mod purchase_repository;
    }
}

pub mod config;
pub(crate) mod constants;
pub mod errors;
pub mod util;

// Vendor-facing seams, implemented by the embedding application.
pub use data::{
    datasources::{
        payment_queue_datasource::PaymentQueueDatasource,
        product_lookup_datasource::{PendingRequest, ProductLookupDatasource},
        product_request_bridge::{
            CallbackProductLookupDatasource, ProductRequestDelegate, ProductRequestStarter,
        },
    },
    models::{
        payment_model::PaymentModel,
        products_response_model::{ProductModel, ProductsResponseModel},
    },
    repositories::purchase_repository_impl::PurchaseRepositoryImpl,
};
