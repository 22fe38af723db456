use serde::Serialize;

use crate::domain::intent::Intent;
use crate::domain::question::StoreId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSet {
    Orders,
    Inventory,
}

impl DataSet {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Orders => "orders",
            Self::Inventory => "inventory",
        }
    }
}

/// One query template with bound parameters. Maps to exactly one data-source
/// call; `render()` is the human-readable form relayed as `query_used`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QuerySpec {
    pub shop: StoreId,
    pub intent: Intent,
    pub metric: &'static str,
    pub source: DataSet,
    pub window_days: Option<u32>,
    pub threshold: Option<u32>,
    pub limit: Option<u32>,
}

impl QuerySpec {
    /// Fixed grammar: `SHOW <metric> FROM <source> [SINCE -<N>d] [WHERE <cond>] [LIMIT <n>]`.
    pub fn render(&self) -> String {
        let mut query = format!("SHOW {} FROM {}", self.metric, self.source.as_str());

        if let Some(days) = self.window_days {
            query.push_str(&format!(" SINCE -{days}d"));
        }
        if let Some(condition) = self.condition() {
            query.push_str(&format!(" WHERE {condition}"));
        }
        if let Some(limit) = self.limit {
            query.push_str(&format!(" LIMIT {limit}"));
        }

        query
    }

    fn condition(&self) -> Option<String> {
        match self.intent {
            Intent::Inventory => self.threshold.map(|threshold| format!("quantity < {threshold}")),
            Intent::Customers => Some("order_count >= 2".to_string()),
            Intent::Sales | Intent::Products | Intent::Unknown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DataSet, QuerySpec};
    use crate::domain::intent::Intent;
    use crate::domain::question::StoreId;

    fn spec(intent: Intent, metric: &'static str, source: DataSet) -> QuerySpec {
        QuerySpec {
            shop: StoreId("myshop.myshopify.com".to_string()),
            intent,
            metric,
            source,
            window_days: None,
            threshold: None,
            limit: None,
        }
    }

    #[test]
    fn renders_all_clauses_in_grammar_order() {
        let rendered = QuerySpec {
            window_days: Some(7),
            limit: Some(5),
            ..spec(Intent::Products, "top_selling_products", DataSet::Orders)
        }
        .render();

        assert_eq!(rendered, "SHOW top_selling_products FROM orders SINCE -7d LIMIT 5");
    }

    #[test]
    fn inventory_renders_threshold_condition() {
        let rendered = QuerySpec {
            threshold: Some(20),
            ..spec(Intent::Inventory, "inventory_levels", DataSet::Inventory)
        }
        .render();

        assert_eq!(rendered, "SHOW inventory_levels FROM inventory WHERE quantity < 20");
    }

    #[test]
    fn customers_renders_repeat_order_condition() {
        let rendered = QuerySpec {
            window_days: Some(30),
            ..spec(Intent::Customers, "repeat_customers", DataSet::Orders)
        }
        .render();

        assert_eq!(rendered, "SHOW repeat_customers FROM orders SINCE -30d WHERE order_count >= 2");
    }

    #[test]
    fn omits_absent_clauses() {
        let rendered = spec(Intent::Sales, "total_sales", DataSet::Orders).render();
        assert_eq!(rendered, "SHOW total_sales FROM orders");
    }
}
