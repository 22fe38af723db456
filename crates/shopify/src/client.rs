use std::time::Duration;

use chrono::Utc;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use shoplens_core::config::ShopifyConfig;
use shoplens_core::domain::query::{DataSet, QuerySpec};
use shoplens_core::domain::record::{InventoryLevel, Order, Records};
use thiserror::Error;

use crate::rest::{InventoryEnvelope, OrdersEnvelope};

/// Every way a live fetch can fail, tagged. None of these propagate past the
/// resolver boundary.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("no access token is configured for `{shop}`")]
    MissingCredential { shop: String },
    #[error("request to `{url}` failed: {source}")]
    Transport { url: String, source: reqwest::Error },
    #[error("`{url}` returned status {status}")]
    Status { url: String, status: StatusCode },
    #[error("could not decode response from `{url}`: {source}")]
    Decode { url: String, source: reqwest::Error },
}

#[derive(Clone)]
pub struct AdminClient {
    client: Client,
    access_token: Option<SecretString>,
    api_version: String,
    timeout: Duration,
}

impl AdminClient {
    pub fn from_config(config: &ShopifyConfig) -> Self {
        Self {
            client: Client::new(),
            access_token: config.access_token.clone(),
            api_version: config.api_version.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    pub fn has_credential(&self) -> bool {
        self.access_token
            .as_ref()
            .map(|token| !token.expose_secret().trim().is_empty())
            .unwrap_or(false)
    }

    /// One QuerySpec maps to exactly one Admin REST call.
    pub async fn fetch(&self, spec: &QuerySpec) -> Result<Records, ClientError> {
        match spec.source {
            DataSet::Orders => self.fetch_orders(spec).await.map(Records::Orders),
            DataSet::Inventory => self.fetch_inventory(spec).await.map(Records::Inventory),
        }
    }

    async fn fetch_orders(&self, spec: &QuerySpec) -> Result<Vec<Order>, ClientError> {
        let mut url = format!(
            "https://{}/admin/api/{}/orders.json?status=any&limit=250",
            spec.shop.0, self.api_version
        );
        if let Some(days) = spec.window_days {
            let since = Utc::now() - chrono::Duration::days(i64::from(days));
            url.push_str(&format!("&created_at_min={}", since.format("%Y-%m-%dT%H:%M:%SZ")));
        }

        let envelope: OrdersEnvelope = self.get_json(&url, &spec.shop.0).await?;
        Ok(envelope.orders.into_iter().map(Order::from).collect())
    }

    async fn fetch_inventory(&self, spec: &QuerySpec) -> Result<Vec<InventoryLevel>, ClientError> {
        let url = format!(
            "https://{}/admin/api/{}/inventory_levels.json?limit=250",
            spec.shop.0, self.api_version
        );

        let envelope: InventoryEnvelope = self.get_json(&url, &spec.shop.0).await?;
        Ok(envelope.inventory_levels.into_iter().map(InventoryLevel::from).collect())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, shop: &str) -> Result<T, ClientError> {
        let access_token = self
            .access_token
            .as_ref()
            .filter(|token| !token.expose_secret().trim().is_empty())
            .ok_or_else(|| ClientError::MissingCredential { shop: shop.to_string() })?;

        let response = self
            .client
            .get(url)
            .header("X-Shopify-Access-Token", access_token.expose_secret())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|source| ClientError::Transport { url: url.to_string(), source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status { url: url.to_string(), status });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| ClientError::Decode { url: url.to_string(), source })
    }
}
