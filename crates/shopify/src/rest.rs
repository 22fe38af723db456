use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use shoplens_core::domain::record::{InventoryLevel, LineItem, Order};

#[derive(Debug, Deserialize)]
pub struct OrdersEnvelope {
    #[serde(default)]
    pub orders: Vec<OrderPayload>,
}

#[derive(Debug, Deserialize)]
pub struct OrderPayload {
    pub id: u64,
    #[serde(default)]
    pub total_price: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub customer: Option<CustomerRef>,
    #[serde(default)]
    pub line_items: Vec<LineItemPayload>,
}

#[derive(Debug, Deserialize)]
pub struct CustomerRef {
    pub id: u64,
}

#[derive(Debug, Deserialize)]
pub struct LineItemPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl From<OrderPayload> for Order {
    fn from(payload: OrderPayload) -> Self {
        Self {
            id: payload.id,
            // Admin API totals are decimal strings; anything unparseable
            // counts as zero rather than failing the whole fetch.
            total_price: payload.total_price.parse::<Decimal>().unwrap_or_default(),
            created_at: payload.created_at,
            customer_id: payload.customer.map(|customer| customer.id),
            line_items: payload
                .line_items
                .into_iter()
                .map(|item| LineItem { title: item.title, quantity: item.quantity })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct InventoryEnvelope {
    #[serde(default)]
    pub inventory_levels: Vec<InventoryLevelPayload>,
}

#[derive(Debug, Deserialize)]
pub struct InventoryLevelPayload {
    pub inventory_item_id: u64,
    pub location_id: u64,
    #[serde(default)]
    pub available: Option<i64>,
}

impl From<InventoryLevelPayload> for InventoryLevel {
    fn from(payload: InventoryLevelPayload) -> Self {
        // inventory_levels.json carries no product names, so items are
        // labelled by their inventory item id.
        Self {
            product_id: payload.inventory_item_id,
            product_name: format!("Item {}", payload.inventory_item_id),
            quantity: payload.available.unwrap_or(0),
            location: format!("Location {}", payload.location_id),
        }
    }
}
