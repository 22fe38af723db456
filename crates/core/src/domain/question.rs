use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreId(pub String);

impl StoreId {
    /// Canonical host form: no protocol, no foreign domain suffix, always
    /// ending in `.myshopify.com`.
    pub fn canonical_host(&self) -> String {
        let shop = self.0.trim();
        let shop = shop.strip_prefix("https://").or_else(|| shop.strip_prefix("http://")).unwrap_or(shop);
        let shop = shop.trim_end_matches('/');

        if shop.ends_with(".myshopify.com") {
            return shop.to_string();
        }

        let shop = shop.split('.').next().unwrap_or(shop);
        format!("{shop}.myshopify.com")
    }
}

impl std::fmt::Display for StoreId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Question {
    pub store: StoreId,
    pub text: String,
}

impl Question {
    pub fn new(store_id: impl Into<String>, text: impl Into<String>) -> Result<Self, DomainError> {
        let store_id = store_id.into();
        let text = text.into();

        if store_id.trim().is_empty() {
            return Err(DomainError::MissingField { field: "store_id" });
        }
        if text.trim().is_empty() {
            return Err(DomainError::MissingField { field: "question" });
        }

        Ok(Self { store: StoreId(store_id), text })
    }
}
