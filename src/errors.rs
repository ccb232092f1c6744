use rust_decimal::Decimal;
use thiserror::Error;

/// Errors surfaced by the purchase operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PurchaseError {
    #[error("another product request is already in progress")]
    AnotherRequestInProgress,
    #[error("the payment queue cannot make purchases")]
    CannotMakePurchase,
    #[error("the store dropped the product request without responding")]
    RequestAbandoned,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Error reported by the vendor store service. Passed through unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{domain} error {code}: {message}")]
pub struct StoreError {
    pub domain: String,
    pub code: i64,
    pub message: String,
}

impl StoreError {
    pub fn new(domain: impl Into<String>, code: i64, message: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceFormatError {
    #[error("malformed price locale '{0}'")]
    MalformedLocale(String),
    #[error("unsupported language '{0}'")]
    UnsupportedLanguage(String),
    #[error("unknown region '{0}'")]
    UnknownRegion(String),
    #[error("unknown currency '{0}'")]
    UnknownCurrency(String),
    #[error("no currency could be derived from locale '{0}'")]
    MissingCurrency(String),
    #[error("cannot format negative price {0}")]
    NegativePrice(Decimal),
    #[error("price {0} cannot be represented with the currency's minor units")]
    UnrepresentablePrice(Decimal),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration value '{0}'")]
    Missing(&'static str),
    #[error("configuration contains no product identifiers")]
    NoProductIdentifiers,
    #[error("failed to parse configuration")]
    Parse(#[from] serde_json::Error),
}
