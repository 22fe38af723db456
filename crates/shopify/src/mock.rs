//! Deterministic synthetic data for degraded mode. Seed values and timestamps
//! are fixed so two calls with the same spec return identical result sets,
//! which keeps degraded-mode behavior reproducible in tests.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use shoplens_core::domain::query::{DataSet, QuerySpec};
use shoplens_core::domain::record::{
    DataOrigin, InventoryLevel, LineItem, Order, Records, ResultSet,
};

pub fn sample(spec: &QuerySpec) -> ResultSet {
    let records = match spec.source {
        DataSet::Orders => Records::Orders(sample_orders()),
        DataSet::Inventory => Records::Inventory(sample_inventory()),
    };

    ResultSet { origin: DataOrigin::Mock, records, query: spec.clone() }
}

fn sample_orders() -> Vec<Order> {
    vec![
        order(1001, 1, 9, Decimal::new(10996, 2), Some(501), &[("Product X", 3), ("Product Z", 1)]),
        order(1002, 2, 10, Decimal::new(9998, 2), Some(502), &[("Product Y", 2)]),
        order(1003, 3, 11, Decimal::new(10798, 2), Some(501), &[("Product X", 2), ("Product B", 4)]),
        order(1004, 4, 14, Decimal::new(9995, 2), Some(503), &[("Product Z", 5)]),
        order(1005, 5, 8, Decimal::new(12400, 2), Some(504), &[("Product C", 1), ("Product A", 2)]),
        order(1006, 6, 16, Decimal::new(7998, 2), Some(502), &[("Product X", 1), ("Product Y", 1)]),
        order(1007, 7, 12, Decimal::new(4850, 2), Some(505), &[("Product B", 2), ("Product A", 1)]),
        order(1008, 8, 13, Decimal::new(6997, 2), Some(503), &[("Product Z", 2), ("Product X", 1)]),
        order(1009, 9, 15, Decimal::new(4999, 2), Some(506), &[("Product Y", 1)]),
        order(1010, 10, 10, Decimal::new(9950, 2), Some(501), &[("Product A", 1), ("Product C", 1)]),
    ]
}

fn sample_inventory() -> Vec<InventoryLevel> {
    vec![
        level(1, "Product A", 15),
        level(2, "Product B", 5),
        level(3, "Product C", 45),
    ]
}

fn order(
    id: u64,
    day: u32,
    hour: u32,
    total_price: Decimal,
    customer_id: Option<u64>,
    items: &[(&str, u32)],
) -> Order {
    Order {
        id,
        total_price,
        created_at: seed_time(day, hour),
        customer_id,
        line_items: items
            .iter()
            .map(|(title, quantity)| LineItem { title: (*title).to_string(), quantity: *quantity })
            .collect(),
    }
}

fn level(product_id: u64, product_name: &str, quantity: i64) -> InventoryLevel {
    InventoryLevel {
        product_id,
        product_name: product_name.to_string(),
        quantity,
        location: "Main Warehouse".to_string(),
    }
}

fn seed_time(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).single().unwrap_or_default()
}
