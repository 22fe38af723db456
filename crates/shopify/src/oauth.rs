use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use shoplens_core::domain::question::StoreId;
use thiserror::Error;

pub const ACCESS_SCOPES: &str = "read_orders,read_products,read_inventory,read_customers";

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("shopify api credentials are not configured")]
    MissingCredentials,
    #[error("token exchange request to `{url}` failed: {source}")]
    Transport { url: String, source: reqwest::Error },
    #[error("token endpoint `{url}` returned status {status}")]
    Status { url: String, status: StatusCode },
    #[error("could not decode token response from `{url}`: {source}")]
    Decode { url: String, source: reqwest::Error },
    #[error("token endpoint returned an empty access token")]
    EmptyToken,
}

/// Step one of the authorization-code exchange: the URL the merchant is
/// redirected to for consent.
pub fn authorize_url(shop_host: &str, api_key: &str, redirect_uri: &str, state: &str) -> String {
    format!(
        "https://{shop_host}/admin/oauth/authorize?client_id={client_id}&scope={scope}&redirect_uri={redirect}&state={state}",
        client_id = encode_query(api_key),
        scope = encode_query(ACCESS_SCOPES),
        redirect = encode_query(redirect_uri),
        state = encode_query(state),
    )
}

#[derive(Debug, Serialize)]
struct TokenExchangeRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Step two: server-to-server POST exchanging the callback code for an
/// access token.
pub async fn exchange_code(
    client: &Client,
    shop: &StoreId,
    api_key: Option<&SecretString>,
    api_secret: Option<&SecretString>,
    code: &str,
) -> Result<AccessTokenResponse, OAuthError> {
    let (api_key, api_secret) = match (api_key, api_secret) {
        (Some(key), Some(secret)) => (key, secret),
        _ => return Err(OAuthError::MissingCredentials),
    };

    let url = format!("https://{}/admin/oauth/access_token", shop.canonical_host());
    let request = TokenExchangeRequest {
        client_id: api_key.expose_secret(),
        client_secret: api_secret.expose_secret(),
        code,
    };

    let response = client
        .post(&url)
        .json(&request)
        .send()
        .await
        .map_err(|source| OAuthError::Transport { url: url.clone(), source })?;

    let status = response.status();
    if !status.is_success() {
        return Err(OAuthError::Status { url, status });
    }

    let token: AccessTokenResponse = response
        .json()
        .await
        .map_err(|source| OAuthError::Decode { url: url.clone(), source })?;

    if token.access_token.trim().is_empty() {
        return Err(OAuthError::EmptyToken);
    }

    Ok(token)
}

fn encode_query(value: &str) -> String {
    value.replace('+', "%2B").replace(' ', "%20").replace('/', "%2F").replace(':', "%3A")
}
