/// Environment variable holding the comma-separated product identifiers.
pub(crate) const PRODUCT_IDENTIFIERS_ENV_KEY: &str = "PURCHASE_PRODUCT_IDENTIFIERS";

/// Payments are always submitted for a single unit.
pub(crate) const PAYMENT_QUANTITY: u32 = 1;
