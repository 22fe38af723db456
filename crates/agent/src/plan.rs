use shoplens_core::config::PipelineConfig;
use shoplens_core::domain::intent::{ClassifiedIntent, Intent};
use shoplens_core::domain::query::{DataSet, QuerySpec};
use shoplens_core::domain::question::StoreId;

/// Orders embedded in an unknown-intent snapshot answer, matching the cap the
/// Admin API responses are trimmed to.
const SNAPSHOT_ORDER_LIMIT: u32 = 10;

/// Stage B: one fixed template per intent. Parameters the question did not
/// supply fall back to configured defaults.
pub fn plan(store: &StoreId, classified: &ClassifiedIntent, config: &PipelineConfig) -> QuerySpec {
    let shop = StoreId(store.canonical_host());
    let window_days = classified.window_days.unwrap_or(config.default_window_days);

    match classified.intent {
        Intent::Inventory => QuerySpec {
            shop,
            intent: Intent::Inventory,
            metric: "inventory_levels",
            source: DataSet::Inventory,
            window_days: None,
            threshold: Some(classified.threshold.unwrap_or(config.default_low_stock_threshold)),
            limit: None,
        },
        Intent::Sales => QuerySpec {
            shop,
            intent: Intent::Sales,
            metric: "total_sales",
            source: DataSet::Orders,
            window_days: Some(window_days),
            threshold: None,
            limit: None,
        },
        Intent::Products => QuerySpec {
            shop,
            intent: Intent::Products,
            metric: "top_selling_products",
            source: DataSet::Orders,
            window_days: Some(window_days),
            threshold: None,
            limit: Some(classified.top_n.unwrap_or(config.default_top_n)),
        },
        Intent::Customers => QuerySpec {
            shop,
            intent: Intent::Customers,
            metric: "repeat_customers",
            source: DataSet::Orders,
            window_days: Some(window_days),
            threshold: None,
            limit: None,
        },
        Intent::Unknown => QuerySpec {
            shop,
            intent: Intent::Unknown,
            metric: "recent_orders",
            source: DataSet::Orders,
            window_days: Some(config.default_window_days),
            threshold: None,
            limit: Some(SNAPSHOT_ORDER_LIMIT),
        },
    }
}
