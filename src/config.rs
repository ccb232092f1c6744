use serde::Deserialize;

use crate::{constants::PRODUCT_IDENTIFIERS_ENV_KEY, errors::ConfigError};

/// Product identifiers the purchase utility requests from the store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseConfig {
    pub product_identifiers: Vec<String>,
}

impl PurchaseConfig {
    /// Reads a comma-separated identifier list from
    /// `PURCHASE_PRODUCT_IDENTIFIERS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let value = std::env::var(PRODUCT_IDENTIFIERS_ENV_KEY)
            .map_err(|_| ConfigError::Missing(PRODUCT_IDENTIFIERS_ENV_KEY))?;
        Self::from_list(&value)
    }

    /// Parses a comma-separated identifier list, e.g. "tip.small, tip.large".
    pub fn from_list(value: &str) -> Result<Self, ConfigError> {
        Self {
            product_identifiers: value.split(',').map(str::to_owned).collect(),
        }
        .validated()
    }

    /// Parses a JSON document of the form `{"productIdentifiers": [...]}`.
    pub fn from_json(body: &str) -> Result<Self, ConfigError> {
        serde_json::from_str::<Self>(body)?.validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        let product_identifiers: Vec<String> = self
            .product_identifiers
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .map(str::to_owned)
            .collect();
        if product_identifiers.is_empty() {
            return Err(ConfigError::NoProductIdentifiers);
        }
        Ok(Self {
            product_identifiers,
        })
    }
}
