use shoplens_core::config::PipelineConfig;
use shoplens_core::domain::answer::{Answer, Confidence};
use shoplens_core::domain::record::{DataOrigin, ResultSet};

use crate::aggregate::Aggregate;

/// Stage D output: phrase-template rendering plus the confidence label.
pub fn explain(aggregate: &Aggregate, result: &ResultSet, config: &PipelineConfig) -> Answer {
    Answer {
        text: answer_text(aggregate),
        confidence: confidence_for(result, config),
        query_used: result.query.render(),
        data: aggregate.payload(result.origin),
    }
}

/// `high` needs live data, a known intent, and enough records. Mock-origin
/// answers never exceed `medium`; empty or unknown never exceed `low`.
fn confidence_for(result: &ResultSet, config: &PipelineConfig) -> Confidence {
    if result.is_empty() || !result.query.intent.is_known() {
        return Confidence::Low;
    }
    if result.origin == DataOrigin::Mock {
        return Confidence::Medium;
    }
    if result.len() >= config.high_confidence_min_records as usize {
        Confidence::High
    } else {
        Confidence::Medium
    }
}

fn answer_text(aggregate: &Aggregate) -> String {
    match aggregate {
        Aggregate::Inventory(report) => format!(
            "Found {low} of {total} products below {threshold} units. Daily movement is roughly \
             {rate} units over the last {window} days; plan to cover about {need} units for the \
             next {forecast} days. Consider reordering soon.",
            low = report.low_stock.len(),
            total = report.levels.len(),
            threshold = report.threshold,
            rate = report.daily_rate,
            window = report.window_days,
            need = report.projected_need,
            forecast = report.forecast_days,
        ),
        Aggregate::Sales(report) => format!(
            "Total sales: ${total} across {count} orders in the last {window} days \
             (average order value ${average}).",
            total = report.total_sales,
            count = report.order_count,
            window = report.window_days,
            average = report.average_order_value,
        ),
        Aggregate::Products(report) => {
            let ranked = report
                .entries
                .iter()
                .enumerate()
                .map(|(index, entry)| {
                    format!("{}. {} ({} units)", index + 1, entry.title, entry.units)
                })
                .collect::<Vec<_>>()
                .join("; ");
            format!(
                "Top {count} selling products in the last {window} days: {ranked}.",
                count = report.entries.len(),
                window = report.window_days,
            )
        }
        Aggregate::Customers(report) => format!(
            "{repeat} of {count} customers placed 2 or more orders in the last {window} days, \
             a repeat rate of {rate}%.",
            repeat = report.repeat_customers,
            count = report.customer_count,
            window = report.window_days,
            rate = report.repeat_rate,
        ),
        Aggregate::Snapshot(snapshot) => format!(
            "I couldn't determine a specific metric for that question, so here is a snapshot of \
             recent activity: {count} orders totalling ${total} in the last {window} days.",
            count = snapshot.order_count,
            total = snapshot.total_sales,
            window = snapshot.window_days,
        ),
        Aggregate::Empty => {
            "No matching data was found for this question. Check the store connection or try a \
             different time window."
                .to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use shoplens_core::config::PipelineConfig;
    use shoplens_core::domain::answer::Confidence;
    use shoplens_core::domain::intent::Intent;
    use shoplens_core::domain::query::{DataSet, QuerySpec};
    use shoplens_core::domain::question::StoreId;
    use shoplens_core::domain::record::{DataOrigin, Order, Records, ResultSet};

    use crate::aggregate::aggregate;

    use super::{confidence_for, explain};

    fn config() -> PipelineConfig {
        PipelineConfig {
            default_top_n: 5,
            default_window_days: 30,
            default_low_stock_threshold: 20,
            forecast_window_days: 30,
            high_confidence_min_records: 5,
        }
    }

    fn result(intent: Intent, origin: DataOrigin, order_count: usize) -> ResultSet {
        let orders: Vec<Order> = (0..order_count)
            .map(|index| Order {
                id: index as u64 + 1,
                total_price: Decimal::new(5000, 2),
                created_at: Utc
                    .with_ymd_and_hms(2024, 3, 1, 9, 0, 0)
                    .single()
                    .expect("valid time"),
                customer_id: Some(index as u64 % 3),
                line_items: Vec::new(),
            })
            .collect();

        ResultSet {
            origin,
            records: Records::Orders(orders),
            query: QuerySpec {
                shop: StoreId("myshop.myshopify.com".to_string()),
                intent,
                metric: "total_sales",
                source: DataSet::Orders,
                window_days: Some(30),
                threshold: None,
                limit: None,
            },
        }
    }

    #[test]
    fn live_data_with_enough_records_is_high_confidence() {
        let result = result(Intent::Sales, DataOrigin::Live, 6);
        assert_eq!(confidence_for(&result, &config()), Confidence::High);
    }

    #[test]
    fn mock_origin_caps_confidence_at_medium() {
        let result = result(Intent::Sales, DataOrigin::Mock, 20);
        assert_eq!(confidence_for(&result, &config()), Confidence::Medium);
    }

    #[test]
    fn sparse_live_data_is_medium_confidence() {
        let result = result(Intent::Sales, DataOrigin::Live, 2);
        assert_eq!(confidence_for(&result, &config()), Confidence::Medium);
    }

    #[test]
    fn empty_results_are_never_high_confidence() {
        let result = result(Intent::Sales, DataOrigin::Live, 0);
        assert_eq!(confidence_for(&result, &config()), Confidence::Low);
    }

    #[test]
    fn unknown_intent_is_low_confidence_even_with_data() {
        let result = result(Intent::Unknown, DataOrigin::Live, 12);
        assert_eq!(confidence_for(&result, &config()), Confidence::Low);
    }

    #[test]
    fn empty_answer_states_that_no_data_matched() {
        let result = result(Intent::Sales, DataOrigin::Live, 0);
        let answer = explain(&aggregate(&result, 30, &config()), &result, &config());

        assert!(answer.text.contains("No matching data"));
        assert_eq!(answer.confidence, Confidence::Low);
        assert_eq!(answer.query_used, "SHOW total_sales FROM orders SINCE -30d");
    }

    #[test]
    fn explanation_is_idempotent() {
        let result = result(Intent::Sales, DataOrigin::Live, 6);
        let computed = aggregate(&result, 30, &config());

        let first = explain(&computed, &result, &config());
        let second = explain(&computed, &result, &config());

        assert_eq!(first, second);
    }
}
