//! Artifact relay daemon — bridges MQTT clients to an OCI registry.
//!
//! Accepts MQTT connections, relays control packets to the upstream
//! endpoint, and injects registry artifacts into each session.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use ar_relayd::config::RelayConfig;
use ar_relayd::service::ProxyService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "ar-relayd starting");

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/etc/artifact-relay/relayd.toml".to_string());

    let config = RelayConfig::from_file(&config_path)?;
    tracing::info!(
        listen_addr = %config.listen_addr,
        upstream_addr = %config.upstream_addr,
        registry = %config.registry.registry_url,
        "config loaded"
    );

    let service = Arc::new(ProxyService::new(&config)?);
    let listener = TcpListener::bind(&config.listen_addr).await?;
    tracing::info!("ar-relayd ready");

    tokio::select! {
        result = service.serve(listener) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "accept loop exited");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
        }
    }

    tracing::info!("ar-relayd stopped");
    Ok(())
}
