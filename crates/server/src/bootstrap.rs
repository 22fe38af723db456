use std::sync::Arc;

use shoplens_agent::Pipeline;
use shoplens_core::config::{AppConfig, ConfigError, LoadOptions};
use shoplens_shopify::{AdminClient, Resolver};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub pipeline: Arc<Pipeline>,
    pub datasource_mode: &'static str,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    Ok(bootstrap_with_config(config))
}

pub fn bootstrap_with_config(config: AppConfig) -> Application {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting analysis service bootstrap"
    );

    let client = AdminClient::from_config(&config.shopify);
    let datasource_mode = if client.has_credential() { "live" } else { "mock-fallback" };
    info!(
        event_name = "system.bootstrap.datasource_ready",
        correlation_id = "bootstrap",
        datasource_mode,
        "data source configured"
    );

    let pipeline = Pipeline::new(Arc::new(Resolver::new(client)), config.pipeline.clone());

    Application { config, pipeline: Arc::new(pipeline), datasource_mode }
}

#[cfg(test)]
mod tests {
    use shoplens_core::config::{ConfigOverrides, LoadOptions};

    use crate::bootstrap::bootstrap;

    #[test]
    fn bootstrap_fails_fast_on_partial_oauth_credentials() {
        let result = bootstrap(LoadOptions {
            overrides: ConfigOverrides {
                shopify_api_key: Some("key-without-secret".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        });

        let message = result.err().expect("partial credentials should fail").to_string();
        assert!(message.contains("shopify.api_secret"));
    }

    #[test]
    fn bootstrap_without_credentials_serves_mock_fallback_mode() {
        let app = bootstrap(LoadOptions::default()).expect("default bootstrap should succeed");
        assert_eq!(app.datasource_mode, "mock-fallback");
    }

    #[test]
    fn bootstrap_with_access_token_serves_live_mode() {
        let app = bootstrap(LoadOptions {
            overrides: ConfigOverrides {
                shopify_access_token: Some("shpat-test".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .expect("bootstrap with token should succeed");

        assert_eq!(app.datasource_mode, "live");
    }
}
