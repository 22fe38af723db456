mod auth;
mod health;
mod questions;

use anyhow::Result;
use shoplens_core::config::{AppConfig, LoadOptions};

fn init_logging(config: &AppConfig) {
    use shoplens_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Load config and initialize logging before any other operations
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let address = format!("{}:{}", config.server.bind_address, config.server.gateway_port);
    let listener = tokio::net::TcpListener::bind(&address).await?;

    let router = questions::router(questions::QuestionsState::from_config(&config.analysis))
        .merge(auth::router(auth::AuthState::from_config(&config.shopify)))
        .merge(health::router());

    tracing::info!(
        event_name = "system.gateway.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        analysis_base_url = %config.analysis.base_url,
        "shoplens gateway started"
    );

    axum::serve(listener, router).with_graceful_shutdown(wait_for_shutdown()).await?;

    tracing::info!(
        event_name = "system.gateway.stopping",
        correlation_id = "shutdown",
        "shoplens gateway stopping"
    );

    Ok(())
}

async fn wait_for_shutdown() {
    let _ = tokio::signal::ctrl_c().await;
}
