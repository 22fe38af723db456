//! Question-answering routes for the Analysis Service.
//!
//! Endpoints:
//! - `GET  /`        — service banner
//! - `POST /analyze` — run a question through the query-intent pipeline
//!
//! Stage C failures never surface here: the data-source resolver substitutes
//! deterministic mock data, so a well-formed request always yields an answer.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shoplens_agent::Pipeline;
use shoplens_core::domain::answer::Confidence;
use shoplens_core::domain::question::Question;
use tracing::info;
use uuid::Uuid;

#[derive(Clone)]
pub struct AnalyzeState {
    pipeline: Arc<Pipeline>,
}

#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    #[serde(default)]
    pub store_id: String,
    #[serde(default)]
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    pub answer: String,
    pub confidence: Confidence,
    pub query_used: String,
    pub data: Value,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub fn router(pipeline: Arc<Pipeline>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/analyze", post(analyze))
        .with_state(AnalyzeState { pipeline })
}

async fn root() -> Json<Value> {
    Json(json!({"message": "shoplens analysis service", "status": "running"}))
}

pub async fn analyze(
    State(state): State<AnalyzeState>,
    Json(request): Json<QuestionRequest>,
) -> Result<Json<QuestionResponse>, (StatusCode, Json<ErrorBody>)> {
    let correlation_id = Uuid::new_v4().simple().to_string();

    let question = Question::new(request.store_id, request.question)
        .map_err(|error| (StatusCode::BAD_REQUEST, Json(ErrorBody { error: error.to_string() })))?;

    let answer = state.pipeline.answer(&question).await;

    info!(
        event_name = "analysis.question_answered",
        correlation_id = %correlation_id,
        shop = %question.store,
        confidence = answer.confidence.as_str(),
        query = %answer.query_used,
        "question answered"
    );

    Ok(Json(QuestionResponse {
        answer: answer.text,
        confidence: answer.confidence,
        query_used: answer.query_used,
        data: answer.data,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::Json;
    use shoplens_agent::Pipeline;
    use shoplens_core::config::{AppConfig, ShopifyConfig};
    use shoplens_core::domain::answer::Confidence;
    use shoplens_shopify::{AdminClient, Resolver};

    use crate::analyze::{analyze, AnalyzeState, QuestionRequest};

    fn mock_only_state() -> AnalyzeState {
        let shopify = ShopifyConfig {
            api_key: None,
            api_secret: None,
            access_token: None,
            api_version: "2024-01".to_string(),
            timeout_secs: 10,
            callback_base_url: None,
        };
        let resolver = Resolver::new(AdminClient::from_config(&shopify));
        let pipeline =
            Pipeline::new(Arc::new(resolver), AppConfig::default().pipeline);
        AnalyzeState { pipeline: Arc::new(pipeline) }
    }

    #[tokio::test]
    async fn rejects_missing_store_id() {
        let request =
            QuestionRequest { store_id: String::new(), question: "top products".to_string() };

        let (status, Json(body)) = analyze(State(mock_only_state()), Json(request))
            .await
            .expect_err("empty store_id should be rejected");

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "store_id parameter is required");
    }

    #[tokio::test]
    async fn rejects_missing_question() {
        let request =
            QuestionRequest { store_id: "shop.myshopify.com".to_string(), question: String::new() };

        let (status, Json(body)) = analyze(State(mock_only_state()), Json(request))
            .await
            .expect_err("empty question should be rejected");

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "question parameter is required");
    }

    #[tokio::test]
    async fn unavailable_data_source_still_produces_an_answer() {
        let request = QuestionRequest {
            store_id: "shop.myshopify.com".to_string(),
            question: "What were my top 5 selling products last week?".to_string(),
        };

        let Json(response) = analyze(State(mock_only_state()), Json(request))
            .await
            .expect("degraded mode should answer, not error");

        assert_eq!(response.confidence, Confidence::Medium);
        assert!(response.query_used.contains("LIMIT 5"));
        assert!(response.query_used.contains("SINCE -7d"));
        assert_eq!(response.data["origin"], "mock");
    }

    #[tokio::test]
    async fn inventory_question_reports_rate_and_projection() {
        let request = QuestionRequest {
            store_id: "shop.myshopify.com".to_string(),
            question: "How much inventory should I reorder based on last 30 days sales?"
                .to_string(),
        };

        let Json(response) = analyze(State(mock_only_state()), Json(request))
            .await
            .expect("inventory question should answer");

        assert!(response.query_used.starts_with("SHOW inventory_levels FROM inventory"));
        assert!(response.answer.contains("units over the last 30 days"));
        assert!(response.answer.contains("plan to cover about 65 units"));
    }

    #[tokio::test]
    async fn unknown_question_is_low_confidence() {
        let request = QuestionRequest {
            store_id: "shop.myshopify.com".to_string(),
            question: "hello there".to_string(),
        };

        let Json(response) = analyze(State(mock_only_state()), Json(request))
            .await
            .expect("unknown intent should still answer");

        assert_eq!(response.confidence, Confidence::Low);
        assert!(response.answer.contains("couldn't determine a specific metric"));
    }
}
