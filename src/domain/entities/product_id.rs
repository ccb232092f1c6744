use std::fmt;

/// Vendor-defined key identifying a purchasable item in the store catalog.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn sku(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductId {
    fn from(sku: &str) -> Self {
        Self(sku.to_owned())
    }
}

impl From<String> for ProductId {
    fn from(sku: String) -> Self {
        Self(sku)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
