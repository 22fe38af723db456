use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

#[derive(Clone)]
pub struct HealthState {
    datasource_mode: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub data_source: HealthCheck,
    pub checked_at: String,
}

pub fn router(datasource_mode: &'static str) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { datasource_mode })
}

/// Degraded mode still answers every question, so the service reports ready
/// either way; the data-source check tells operators which mode they are in.
pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let data_source = HealthCheck {
        status: "ready",
        detail: match state.datasource_mode {
            "live" => "live Shopify Admin API credential configured".to_string(),
            _ => "no access token configured, serving deterministic mock data".to_string(),
        },
    };

    let payload = HealthResponse {
        status: "ready",
        service: HealthCheck {
            status: "ready",
            detail: "shoplens-server runtime initialized".to_string(),
        },
        data_source,
        checked_at: Utc::now().to_rfc3339(),
    };

    (StatusCode::OK, Json(payload))
}

#[cfg(test)]
mod tests {
    use axum::{extract::State, http::StatusCode, Json};

    use crate::health::{health, HealthState};

    #[tokio::test]
    async fn health_reports_live_mode() {
        let (status, Json(payload)) = health(State(HealthState { datasource_mode: "live" })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.status, "ready");
        assert!(payload.data_source.detail.contains("live"));
    }

    #[tokio::test]
    async fn health_reports_mock_fallback_mode() {
        let (status, Json(payload)) =
            health(State(HealthState { datasource_mode: "mock-fallback" })).await;

        assert_eq!(status, StatusCode::OK);
        assert!(payload.data_source.detail.contains("mock"));
    }
}
