//! The gateway's single business route.
//!
//! `POST /questions` validates the two required fields, forwards the request
//! to the Analysis Service with a bounded timeout, and relays the analysis
//! JSON body verbatim. No data transformation happens here.

use std::time::Duration;

use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shoplens_core::config::AnalysisConfig;
use shoplens_core::domain::question::Question;
use shoplens_core::errors::{ApplicationError, InterfaceError};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct QuestionsState {
    client: reqwest::Client,
    analyze_url: String,
    timeout: Duration,
}

impl QuestionsState {
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            analyze_url: format!("{}/analyze", config.base_url.trim_end_matches('/')),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct QuestionRequest {
    #[serde(default)]
    pub store_id: String,
    #[serde(default)]
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

pub fn router(state: QuestionsState) -> Router {
    Router::new().route("/questions", post(ask_question)).with_state(state)
}

pub async fn ask_question(
    State(state): State<QuestionsState>,
    Json(request): Json<QuestionRequest>,
) -> Result<Json<Value>, (StatusCode, Json<ErrorBody>)> {
    let correlation_id = Uuid::new_v4().simple().to_string();

    // Validation only; all business logic lives in the analysis service.
    Question::new(request.store_id.clone(), request.question.clone()).map_err(|error| {
        reply(ApplicationError::from(error).into_interface(correlation_id.clone()))
    })?;

    let response = state
        .client
        .post(&state.analyze_url)
        .timeout(state.timeout)
        .json(&request)
        .send()
        .await
        .map_err(|error| {
            warn!(
                event_name = "gateway.analysis_unreachable",
                correlation_id = %correlation_id,
                error = %error,
                "analysis service call failed"
            );
            reply(
                ApplicationError::DownstreamUnavailable {
                    message: "analysis service is unreachable".to_string(),
                    details: Some(error.to_string()),
                }
                .into_interface(correlation_id.clone()),
            )
        })?;

    let status = response.status();
    let body: Value = response.json().await.map_err(|error| {
        reply(
            ApplicationError::DownstreamUnavailable {
                message: "analysis service returned an unreadable response".to_string(),
                details: Some(error.to_string()),
            }
            .into_interface(correlation_id.clone()),
        )
    })?;

    if !status.is_success() {
        let details = body.get("error").and_then(Value::as_str).map(str::to_string);
        return Err(reply(
            ApplicationError::DownstreamRejected {
                message: "analysis service rejected the question".to_string(),
                details,
            }
            .into_interface(correlation_id.clone()),
        ));
    }

    info!(
        event_name = "gateway.question_relayed",
        correlation_id = %correlation_id,
        "analysis response relayed"
    );

    Ok(Json(body))
}

fn reply(error: InterfaceError) -> (StatusCode, Json<ErrorBody>) {
    let status = match &error {
        InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        InterfaceError::Unprocessable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let body = ErrorBody {
        error: error.message().to_string(),
        details: error.details().map(str::to_string),
    };
    (status, Json(body))
}
