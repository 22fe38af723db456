use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use shoplens_core::config::PipelineConfig;
use shoplens_core::domain::intent::Intent;
use shoplens_core::domain::record::{DataOrigin, InventoryLevel, Order, Records, ResultSet};

/// Stage D input: the per-intent fixed aggregation over a result set.
/// Pure and idempotent over its inputs.
#[derive(Clone, Debug, PartialEq)]
pub enum Aggregate {
    Inventory(InventoryReport),
    Sales(SalesReport),
    Products(ProductRanking),
    Customers(CustomerReport),
    Snapshot(OrderSnapshot),
    Empty,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InventoryReport {
    pub levels: Vec<InventoryLevel>,
    pub low_stock: Vec<InventoryLevel>,
    pub threshold: u32,
    pub units_on_hand: u64,
    pub daily_rate: Decimal,
    pub projected_need: u64,
    pub window_days: u32,
    pub forecast_days: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SalesReport {
    pub total_sales: Decimal,
    pub order_count: usize,
    pub average_order_value: Decimal,
    pub window_days: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProductRanking {
    pub entries: Vec<RankedProduct>,
    pub window_days: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankedProduct {
    pub title: String,
    pub units: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CustomerReport {
    pub customer_count: usize,
    pub repeat_customers: usize,
    pub repeat_rate: Decimal,
    pub window_days: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OrderSnapshot {
    pub order_count: usize,
    pub total_sales: Decimal,
    pub recent: Vec<Order>,
    pub window_days: u32,
}

pub fn aggregate(result: &ResultSet, window_days: u32, config: &PipelineConfig) -> Aggregate {
    if result.is_empty() {
        return Aggregate::Empty;
    }

    match (&result.records, result.query.intent) {
        (Records::Inventory(levels), _) => {
            Aggregate::Inventory(inventory_report(levels, result, window_days, config))
        }
        (Records::Orders(orders), Intent::Sales) => {
            Aggregate::Sales(sales_report(orders, window_days))
        }
        (Records::Orders(orders), Intent::Products) => {
            Aggregate::Products(product_ranking(orders, result, window_days, config))
        }
        (Records::Orders(orders), Intent::Customers) => {
            Aggregate::Customers(customer_report(orders, window_days))
        }
        (Records::Orders(orders), _) => {
            Aggregate::Snapshot(order_snapshot(orders, result, window_days))
        }
    }
}

fn inventory_report(
    levels: &[InventoryLevel],
    result: &ResultSet,
    window_days: u32,
    config: &PipelineConfig,
) -> InventoryReport {
    let threshold =
        result.query.threshold.unwrap_or(config.default_low_stock_threshold);
    let low_stock: Vec<InventoryLevel> = levels
        .iter()
        .filter(|level| level.quantity < i64::from(threshold))
        .cloned()
        .collect();

    let units_on_hand: u64 = levels.iter().map(|level| level.quantity.max(0) as u64).sum();
    let daily_rate =
        (Decimal::from(units_on_hand) / Decimal::from(window_days.max(1))).round_dp(2);
    let forecast_days = config.forecast_window_days;
    let projected_need = (daily_rate * Decimal::from(forecast_days))
        .round()
        .to_u64()
        .unwrap_or(0);

    InventoryReport {
        levels: levels.to_vec(),
        low_stock,
        threshold,
        units_on_hand,
        daily_rate,
        projected_need,
        window_days,
        forecast_days,
    }
}

fn sales_report(orders: &[Order], window_days: u32) -> SalesReport {
    let total_sales: Decimal = orders.iter().map(|order| order.total_price).sum();
    let total_sales = total_sales.round_dp(2);
    let order_count = orders.len();
    let average_order_value = if order_count > 0 {
        (total_sales / Decimal::from(order_count)).round_dp(2)
    } else {
        Decimal::ZERO
    };

    SalesReport { total_sales, order_count, average_order_value, window_days }
}

fn product_ranking(
    orders: &[Order],
    result: &ResultSet,
    window_days: u32,
    config: &PipelineConfig,
) -> ProductRanking {
    let mut units_by_title: BTreeMap<&str, u64> = BTreeMap::new();
    for order in orders {
        for item in &order.line_items {
            *units_by_title.entry(item.title.as_str()).or_default() += u64::from(item.quantity);
        }
    }

    let mut entries: Vec<RankedProduct> = units_by_title
        .into_iter()
        .map(|(title, units)| RankedProduct { title: title.to_string(), units })
        .collect();
    // Stable sort keeps the alphabetical order of the map as the tie-break.
    entries.sort_by(|a, b| b.units.cmp(&a.units));

    let limit = result.query.limit.unwrap_or(config.default_top_n) as usize;
    entries.truncate(limit);

    ProductRanking { entries, window_days }
}

fn customer_report(orders: &[Order], window_days: u32) -> CustomerReport {
    let mut orders_by_customer: BTreeMap<u64, u32> = BTreeMap::new();
    for order in orders {
        if let Some(customer_id) = order.customer_id {
            *orders_by_customer.entry(customer_id).or_default() += 1;
        }
    }

    let customer_count = orders_by_customer.len();
    let repeat_customers =
        orders_by_customer.values().filter(|order_count| **order_count >= 2).count();
    let repeat_rate = if customer_count > 0 {
        (Decimal::from(repeat_customers) * Decimal::from(100u32)
            / Decimal::from(customer_count))
        .round_dp(1)
    } else {
        Decimal::ZERO
    };

    CustomerReport { customer_count, repeat_customers, repeat_rate, window_days }
}

fn order_snapshot(orders: &[Order], result: &ResultSet, window_days: u32) -> OrderSnapshot {
    let total_sales: Decimal = orders.iter().map(|order| order.total_price).sum();
    let embed_limit = result.query.limit.unwrap_or(10) as usize;

    OrderSnapshot {
        order_count: orders.len(),
        total_sales: total_sales.round_dp(2),
        recent: orders.iter().take(embed_limit).cloned().collect(),
        window_days,
    }
}

impl Aggregate {
    /// The `data` object relayed to the caller, in the platform's familiar
    /// response shapes, tagged with the record origin.
    pub fn payload(&self, origin: DataOrigin) -> Value {
        let mut payload = match self {
            Self::Inventory(report) => json!({
                "inventory_levels": report.levels,
                "low_stock_count": report.low_stock.len(),
                "threshold": report.threshold,
                "daily_rate": report.daily_rate,
                "projected_need": report.projected_need,
            }),
            Self::Sales(report) => json!({
                "total_sales": report.total_sales,
                "order_count": report.order_count,
                "average_order_value": report.average_order_value,
                "period": format!("last {} days", report.window_days),
            }),
            Self::Products(report) => json!({
                "top_products": report
                    .entries
                    .iter()
                    .map(|entry| json!({"title": entry.title, "units": entry.units}))
                    .collect::<Vec<Value>>(),
                "period": format!("last {} days", report.window_days),
            }),
            Self::Customers(report) => json!({
                "customer_count": report.customer_count,
                "repeat_customers": report.repeat_customers,
                "repeat_rate": report.repeat_rate,
                "period": format!("last {} days", report.window_days),
            }),
            Self::Snapshot(snapshot) => json!({
                "order_count": snapshot.order_count,
                "total_sales": snapshot.total_sales,
                "orders": snapshot.recent,
                "period": format!("last {} days", snapshot.window_days),
            }),
            Self::Empty => json!({}),
        };

        if let Some(object) = payload.as_object_mut() {
            object.insert("origin".to_string(), json!(origin.as_str()));
        }
        payload
    }
}
