//! Credential-exchange routes.
//!
//! Endpoints:
//! - `GET /auth/start?shop=<id>`                — redirect to the platform
//!   authorization URL
//! - `GET /auth/callback?shop=<id>&code=<code>` — exchange the returned code
//!   for an access token
//!
//! The obtained token is returned to the operator and lives in process
//! configuration for the service lifetime; nothing is persisted.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Json, Redirect},
    routing::get,
    Router,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use shoplens_core::config::ShopifyConfig;
use shoplens_core::domain::question::StoreId;
use shoplens_shopify::oauth;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct AuthState {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    api_secret: Option<SecretString>,
    callback_base_url: Option<String>,
}

impl AuthState {
    pub fn from_config(config: &ShopifyConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            callback_base_url: config.callback_base_url.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StartQuery {
    #[serde(default)]
    pub shop: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    pub shop: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CallbackResponse {
    pub message: String,
    pub shop: String,
    pub access_token: String,
}

pub fn router(state: AuthState) -> Router {
    Router::new()
        .route("/auth/start", get(start_auth))
        .route("/auth/callback", get(auth_callback))
        .with_state(state)
}

pub async fn start_auth(
    State(state): State<AuthState>,
    Query(query): Query<StartQuery>,
) -> Result<Redirect, (StatusCode, Json<AuthErrorBody>)> {
    let shop = require_param(query.shop, "shop")?;
    let api_key = state.api_key.as_ref().ok_or_else(|| {
        bad_request("shopify api credentials are not configured".to_string())
    })?;
    let callback_base = state.callback_base_url.as_deref().ok_or_else(|| {
        bad_request("shopify.callback_base_url is not configured".to_string())
    })?;

    let redirect_uri = format!("{}/auth/callback", callback_base.trim_end_matches('/'));
    let state_token = Uuid::new_v4().simple().to_string();
    let shop_host = StoreId(shop).canonical_host();
    let authorization_url =
        oauth::authorize_url(&shop_host, api_key.expose_secret(), &redirect_uri, &state_token);

    info!(
        event_name = "gateway.oauth_started",
        shop = %shop_host,
        "redirecting merchant to authorization URL"
    );

    Ok(Redirect::temporary(&authorization_url))
}

pub async fn auth_callback(
    State(state): State<AuthState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Json<CallbackResponse>, (StatusCode, Json<AuthErrorBody>)> {
    let shop = require_param(query.shop, "shop")?;
    let code = require_param(query.code, "code")?;
    let store = StoreId(shop);

    match oauth::exchange_code(
        &state.client,
        &store,
        state.api_key.as_ref(),
        state.api_secret.as_ref(),
        &code,
    )
    .await
    {
        Ok(token) => {
            info!(event_name = "gateway.oauth_connected", shop = %store, "access token obtained");
            Ok(Json(CallbackResponse {
                message: "Shopify authorization complete. Configure this token as \
                          shopify.access_token to enable live data."
                    .to_string(),
                shop: store.canonical_host(),
                access_token: token.access_token,
            }))
        }
        Err(error) => {
            warn!(
                event_name = "gateway.oauth_failed",
                shop = %store,
                error = %error,
                "token exchange failed"
            );
            Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(AuthErrorBody {
                    error: "token exchange failed".to_string(),
                    details: Some(error.to_string()),
                }),
            ))
        }
    }
}

fn require_param(
    value: Option<String>,
    name: &str,
) -> Result<String, (StatusCode, Json<AuthErrorBody>)> {
    value
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| bad_request(format!("{name} parameter is required")))
}

fn bad_request(error: String) -> (StatusCode, Json<AuthErrorBody>) {
    (StatusCode::BAD_REQUEST, Json(AuthErrorBody { error, details: None }))
}

#[cfg(test)]
mod tests {
    use axum::extract::{Query, State};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::Json;

    use crate::auth::{auth_callback, start_auth, AuthState, CallbackQuery, StartQuery};

    fn configured_state() -> AuthState {
        AuthState {
            client: reqwest::Client::new(),
            api_key: Some("client-key".to_string().into()),
            api_secret: Some("client-secret".to_string().into()),
            callback_base_url: Some("https://gateway.example.com".to_string()),
        }
    }

    fn unconfigured_state() -> AuthState {
        AuthState {
            client: reqwest::Client::new(),
            api_key: None,
            api_secret: None,
            callback_base_url: None,
        }
    }

    #[tokio::test]
    async fn start_requires_a_shop_parameter() {
        let (status, Json(body)) =
            start_auth(State(configured_state()), Query(StartQuery { shop: None }))
                .await
                .expect_err("missing shop should be rejected");

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "shop parameter is required");
    }

    #[tokio::test]
    async fn start_requires_configured_credentials() {
        let (status, Json(body)) = start_auth(
            State(unconfigured_state()),
            Query(StartQuery { shop: Some("myshop".to_string()) }),
        )
        .await
        .expect_err("missing credentials should be rejected");

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error.contains("credentials"));
    }

    #[tokio::test]
    async fn start_redirects_to_the_authorization_url() {
        let redirect = start_auth(
            State(configured_state()),
            Query(StartQuery { shop: Some("https://myshop".to_string()) }),
        )
        .await
        .expect("configured start should redirect");

        let response = redirect.into_response();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

        let location = response
            .headers()
            .get("location")
            .and_then(|value| value.to_str().ok())
            .expect("redirect should carry a location header");
        assert!(location.starts_with("https://myshop.myshopify.com/admin/oauth/authorize?"));
        assert!(location.contains("client_id=client-key"));
        assert!(location.contains("state="));
    }

    #[tokio::test]
    async fn callback_requires_shop_and_code() {
        let (status, Json(body)) = auth_callback(
            State(configured_state()),
            Query(CallbackQuery { shop: Some("myshop".to_string()), code: None }),
        )
        .await
        .expect_err("missing code should be rejected");

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "code parameter is required");
    }

    #[tokio::test]
    async fn callback_without_credentials_is_unprocessable() {
        let (status, Json(body)) = auth_callback(
            State(unconfigured_state()),
            Query(CallbackQuery {
                shop: Some("myshop".to_string()),
                code: Some("abc123".to_string()),
            }),
        )
        .await
        .expect_err("exchange without credentials should fail");

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.error, "token exchange failed");
        assert!(body.details.is_some());
    }
}
