use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tracing::{info, warn};

use good_gateway::api::{RateLimitConfig, create_router_with_rate_limit};
use good_gateway::app::AppState;
use good_gateway::config::AppConfig;
use good_gateway::infra::observability::{init_metrics_handle, init_tracing};
use good_gateway::infra::{HttpClientConfig, HttpCoinInfoClient, HttpGoodBackend};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = AppConfig::from_env()?;
    init_tracing(config.log_format);

    let metrics = init_metrics_handle();
    if metrics.is_none() {
        warn!("Metrics recorder could not be installed, /metrics is disabled");
    }

    let client_config = HttpClientConfig {
        timeout: config.downstream_timeout(),
    };
    let backend = Arc::new(HttpGoodBackend::new(
        &config.good_middleware_url,
        client_config.clone(),
    )?);
    let coininfo = Arc::new(HttpCoinInfoClient::new(
        &config.coininfo_url,
        client_config,
    )?);

    let app_state = Arc::new(AppState::new(backend, coininfo).with_metrics(metrics));

    let router = create_router_with_rate_limit(
        app_state,
        RateLimitConfig::new(config.rate_limit_rps, config.rate_limit_burst),
        config.request_timeout(),
    );

    let listener = tokio::net::TcpListener::bind(config.server_addr).await?;
    info!(
        addr = %config.server_addr,
        good_middleware = %config.good_middleware_url,
        coininfo = %config.coininfo_url,
        "Server starting"
    );

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
