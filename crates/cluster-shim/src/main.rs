//! Cluster Shim binary.
//!
//! Runs a shim that receives control requests via NATS and executes them
//! against the cluster API.

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cluster_shim::{Shim, ShimConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,cluster_shim=debug".into()),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!("Starting Cluster Shim");

    // Load configuration
    let config = ShimConfig::from_env()?;
    tracing::info!(
        shim_id = %config.shim_id,
        cluster_api_url = %config.cluster_api_url,
        nats_url = %config.nats_url,
        subject = %config.subject,
        "Shim configuration loaded"
    );

    let shim = Shim::new(config).await?;

    // Handle shutdown signals
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
        tracing::info!("Shutdown signal received");
    };

    tokio::select! {
        result = shim.run() => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Shim error");
                return Err(e);
            }
        }
        _ = shutdown => {
            tracing::info!("Shutting down shim");
        }
    }

    tracing::info!("Shim stopped");
    Ok(())
}
