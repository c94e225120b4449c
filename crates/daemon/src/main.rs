//! Jobgate - Main Entry Point
//! Authenticated HTTP intake relaying job bodies onto an AMQP exchange

mod config;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::GatewayConfig;
use jobgate_api_http::{HttpServer, HttpServerConfig};
use jobgate_core::application::JobIntakeService;
use jobgate_infra_amqp::{redact_uri, AmqpPublisher};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // 0. Pick up .env (missing file is fine)
    dotenvy::dotenv().ok();

    // 1. Initialize logging
    let log_format = std::env::var("JOBGATE_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("jobgate=info,tower_http=info"))
        .context("Failed to create env filter")?;

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    info!("Jobgate v{} starting...", VERSION);

    // 2. Load configuration (malformed config is fatal)
    let config = GatewayConfig::from_env().context("Invalid configuration")?;

    if config.credentials.is_empty() {
        warn!("API_KEYS is empty: every job submission will be rejected");
    }
    info!(
        amqp_url = %redact_uri(&config.amqp_url),
        exchange = %config.target.exchange,
        routing_key = %config.target.routing_key,
        api_keys = config.credentials.len(),
        publish_timeout_ms = config.publish_timeout.as_millis() as u64,
        "Configuration loaded"
    );

    // 3. Connect to broker (fail fast)
    let publisher = Arc::new(
        AmqpPublisher::connect(&config.amqp_url)
            .await
            .context("Failed to connect to AMQP broker")?,
    );

    // 4. Setup dependencies (DI wiring)
    let intake = Arc::new(
        JobIntakeService::new(publisher.clone(), config.target.clone())
            .with_publish_timeout(config.publish_timeout),
    );

    // 5. Start HTTP server
    let server = HttpServer::new(
        HttpServerConfig {
            host: config.host.clone(),
            port: config.port,
            body_limit: config.body_limit,
        },
        intake,
        Arc::new(config.credentials),
    );
    let running = server.start().await.context("HTTP server start failed")?;

    info!(addr = %running.local_addr(), "Server running on port {}", config.port);

    // 6. Wait for shutdown signal
    shutdown_signal().await?;

    info!("Shutdown signal received. Draining requests...");

    // 7. Graceful shutdown
    running.stop().await.context("HTTP server stop failed")?;
    if let Err(e) = publisher.close().await {
        warn!(error = %e, "Failed to close AMQP connection cleanly");
    }

    info!("Shutdown complete.");

    Ok(())
}

#[cfg(unix)]
async fn shutdown_signal() -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => res?,
        _ = terminate.recv() => {}
    }
    Ok(())
}

#[cfg(not(unix))]
async fn shutdown_signal() -> Result<()> {
    tokio::signal::ctrl_c().await?;
    Ok(())
}
