use std::sync::Arc;

use shoplens_core::config::PipelineConfig;
use shoplens_core::datasource::DataSource;
use shoplens_core::domain::answer::Answer;
use shoplens_core::domain::question::Question;
use tracing::debug;

use crate::{aggregate, classify, explain, plan};

/// The four-stage pipeline orchestrator. Strictly linear per request with no
/// backtracking; holds no mutable state, so concurrent questions are
/// independent.
pub struct Pipeline {
    datasource: Arc<dyn DataSource>,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(datasource: Arc<dyn DataSource>, config: PipelineConfig) -> Self {
        Self { datasource, config }
    }

    pub async fn answer(&self, question: &Question) -> Answer {
        let classified = classify::classify(&question.text);
        let window_days = classified.window_days.unwrap_or(self.config.default_window_days);
        let spec = plan::plan(&question.store, &classified, &self.config);

        debug!(
            event_name = "pipeline.query_planned",
            shop = %spec.shop,
            intent = classified.intent.as_str(),
            query = %spec.render(),
            "question classified and query planned"
        );

        let result = self.datasource.fetch(&spec).await;
        let computed = aggregate::aggregate(&result, window_days, &self.config);
        explain::explain(&computed, &result, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use shoplens_core::config::PipelineConfig;
    use shoplens_core::datasource::DataSource;
    use shoplens_core::domain::answer::Confidence;
    use shoplens_core::domain::query::{DataSet, QuerySpec};
    use shoplens_core::domain::question::Question;
    use shoplens_core::domain::record::{DataOrigin, LineItem, Order, Records, ResultSet};

    use super::Pipeline;

    struct FixedOrders {
        origin: DataOrigin,
        orders: Vec<Order>,
    }

    #[async_trait]
    impl DataSource for FixedOrders {
        async fn fetch(&self, spec: &QuerySpec) -> ResultSet {
            let records = match spec.source {
                DataSet::Orders => Records::Orders(self.orders.clone()),
                DataSet::Inventory => Records::Inventory(Vec::new()),
            };
            ResultSet { origin: self.origin, records, query: spec.clone() }
        }
    }

    fn order(id: u64, customer_id: u64, items: &[(&str, u32)]) -> Order {
        Order {
            id,
            total_price: Decimal::new(4999, 2),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).single().expect("valid time"),
            customer_id: Some(customer_id),
            line_items: items
                .iter()
                .map(|(title, quantity)| LineItem {
                    title: (*title).to_string(),
                    quantity: *quantity,
                })
                .collect(),
        }
    }

    fn six_product_orders() -> Vec<Order> {
        vec![
            order(1, 1, &[("Product X", 3), ("Product Z", 1)]),
            order(2, 2, &[("Product Y", 2)]),
            order(3, 1, &[("Product X", 2), ("Product B", 4)]),
            order(4, 3, &[("Product Z", 5)]),
            order(5, 4, &[("Product C", 1), ("Product A", 2)]),
            order(6, 2, &[("Product B", 2), ("Product A", 1)]),
        ]
    }

    fn pipeline(origin: DataOrigin, orders: Vec<Order>) -> Pipeline {
        Pipeline::new(
            Arc::new(FixedOrders { origin, orders }),
            PipelineConfig {
                default_top_n: 5,
                default_window_days: 30,
                default_low_stock_threshold: 20,
                forecast_window_days: 30,
                high_confidence_min_records: 5,
            },
        )
    }

    #[tokio::test]
    async fn top_products_question_yields_ranked_high_confidence_answer() {
        let pipeline = pipeline(DataOrigin::Live, six_product_orders());
        let question = Question::new("shop.myshopify.com", "What were my top 5 selling products last week?")
            .expect("valid question");

        let answer = pipeline.answer(&question).await;

        assert_eq!(answer.confidence, Confidence::High);
        assert!(answer.query_used.contains("SINCE -7d"));
        assert!(answer.query_used.contains("LIMIT 5"));
        assert!(answer.text.starts_with("Top 5 selling products"));
        assert!(answer.text.contains("5."), "answer should list five ranked entries");
        assert!(!answer.text.contains("6."), "answer should not list a sixth entry");
    }

    #[tokio::test]
    async fn unknown_question_yields_low_confidence_snapshot() {
        let pipeline = pipeline(DataOrigin::Live, six_product_orders());
        let question = Question::new("shop", "hello there").expect("valid question");

        let answer = pipeline.answer(&question).await;

        assert_eq!(answer.confidence, Confidence::Low);
        assert!(answer.text.contains("couldn't determine a specific metric"));
        assert!(answer.query_used.starts_with("SHOW recent_orders FROM orders"));
    }

    #[tokio::test]
    async fn mock_origin_answers_are_capped_at_medium() {
        let pipeline = pipeline(DataOrigin::Mock, six_product_orders());
        let question =
            Question::new("shop", "How much revenue in the last 30 days?").expect("valid question");

        let answer = pipeline.answer(&question).await;

        assert_eq!(answer.confidence, Confidence::Medium);
        assert!(answer.text.starts_with("Total sales:"));
    }

    #[tokio::test]
    async fn empty_results_produce_an_answer_rather_than_an_error() {
        let pipeline = pipeline(DataOrigin::Live, Vec::new());
        let question =
            Question::new("shop", "sales for the last week").expect("valid question");

        let answer = pipeline.answer(&question).await;

        assert_eq!(answer.confidence, Confidence::Low);
        assert!(answer.text.contains("No matching data"));
    }

    #[tokio::test]
    async fn repeat_customer_question_reports_rate() {
        let pipeline = pipeline(DataOrigin::Live, six_product_orders());
        let question =
            Question::new("shop", "How many repeat customers in the last month?")
                .expect("valid question");

        let answer = pipeline.answer(&question).await;

        assert!(answer.query_used.contains("WHERE order_count >= 2"));
        assert!(answer.text.contains("repeat rate"));
    }
}
