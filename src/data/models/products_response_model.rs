use rust_decimal::Decimal;
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr};

/// Response of the vendor product-lookup service.
///
/// The vendor splits the requested identifiers into products that exist in
/// the store and identifiers it does not recognize.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductsResponseModel {
    /// Products found in the store catalog.
    #[serde(default)]
    pub products: Vec<ProductModel>,
    /// Requested identifiers that do not correspond to a purchasable product.
    #[serde(default)]
    pub invalid_product_identifiers: Vec<String>,
}

/// Vendor product record.
#[serde_as]
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductModel {
    /// The identifier the product was registered under in the store.
    pub product_identifier: String,
    /// Name of the product, in the store's locale.
    pub localized_title: String,
    /// Description of the product, in the store's locale. Not every store
    /// provides one.
    #[serde(default)]
    pub localized_description: String,
    /// Price in the currency of `price_locale`. Sent as a decimal string to
    /// avoid floating point loss.
    #[serde_as(as = "DisplayFromStr")]
    pub price: Decimal,
    /// ICU locale identifier of the price, e.g. "en_US@currency=USD".
    pub price_locale: String,
}
