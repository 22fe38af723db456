use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::query::QuerySpec;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub title: String,
    pub quantity: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub customer_id: Option<u64>,
    pub line_items: Vec<LineItem>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryLevel {
    pub product_id: u64,
    pub product_name: String,
    pub quantity: i64,
    pub location: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Records {
    Orders(Vec<Order>),
    Inventory(Vec<InventoryLevel>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataOrigin {
    Live,
    Mock,
}

impl DataOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Mock => "mock",
        }
    }
}

/// Raw records for one executed QuerySpec. An empty record list is a valid
/// outcome, not an error.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultSet {
    pub origin: DataOrigin,
    pub records: Records,
    pub query: QuerySpec,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        match &self.records {
            Records::Orders(orders) => orders.len(),
            Records::Inventory(levels) => levels.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
