use rust_decimal::Decimal;

use crate::errors::PriceFormatError;

use super::{price_locale::PriceLocale, product_id::ProductId};

/// A product available for purchase, as returned by the store.
///
/// Only display-relevant fields of the vendor record are exposed. Products can
/// only be obtained from a product request, so anything passed to
/// [`crate::util::PurchaseUtil::purchase`] is known to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    id: ProductId,
    localized_title: String,
    localized_description: String,
    price: Decimal,
    price_locale: String,
}

impl Product {
    pub(crate) fn new(
        id: ProductId,
        localized_title: String,
        localized_description: String,
        price: Decimal,
        price_locale: String,
    ) -> Self {
        Self {
            id,
            localized_title,
            localized_description,
            price,
            price_locale,
        }
    }

    pub fn id(&self) -> &ProductId {
        &self.id
    }

    pub fn sku(&self) -> &str {
        self.id.sku()
    }

    pub fn localized_title(&self) -> &str {
        &self.localized_title
    }

    pub fn localized_description(&self) -> &str {
        &self.localized_description
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Locale identifier the store reported the price in.
    pub fn price_locale(&self) -> &str {
        &self.price_locale
    }

    /// Price formatted as a currency string in the store's locale.
    ///
    /// Fails when the store reports a locale or currency that cannot be
    /// formatted.
    pub fn localized_price(&self) -> Result<String, PriceFormatError> {
        PriceLocale::parse(&self.price_locale)?.format(self.price)
    }
}
