use serde::Serialize;

use crate::constants::PAYMENT_QUANTITY;

/// Purchase request submitted to the vendor payment queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentModel {
    /// Identifier of the product being purchased.
    pub product_identifier: String,
    /// Number of units. Always 1.
    pub quantity: u32,
}

impl PaymentModel {
    pub(crate) fn for_product(product_identifier: &str) -> Self {
        Self {
            product_identifier: product_identifier.to_owned(),
            quantity: PAYMENT_QUANTITY,
        }
    }
}
