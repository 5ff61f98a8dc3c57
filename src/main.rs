//! Catalog gateway.
//!
//! Serves the catalog API locally, forwarding every request to the
//! configured origin through the interceptor.
//!
//! ```text
//!   client ──▶ gateway (axum) ──▶ Interceptor ──▶ HttpFetcher ──▶ catalog origin
//!                                     │
//!                                     └── empty/unusable lookups ──▶ public relay
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_interceptor::config::{resolve_config, ConfigOverrides};
use catalog_interceptor::gateway::Gateway;
use catalog_interceptor::lifecycle::{wait_for_ctrl_c, Shutdown};
use catalog_interceptor::observability::{metrics, TracingDiagnostics};
use catalog_interceptor::{HttpFetcher, Interceptor};

#[derive(Parser)]
#[command(name = "catalog-gateway")]
#[command(about = "Local gateway that rewrites catalog API responses", long_about = None)]
struct Cli {
    /// TOML configuration file; built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override gateway.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = resolve_config(
        cli.config.as_deref(),
        ConfigOverrides {
            bind_address: cli.bind,
        },
    )?;

    let default_filter = format!(
        "catalog_interceptor={level},catalog_gateway={level},tower_http=info",
        level = config.observability.log_level
    );
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        origin = %config.origin.base_url,
        relay = %config.relay.endpoint,
        bind_address = %config.gateway.bind_address,
        "catalog-gateway v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let fetcher = Arc::new(HttpFetcher::new(config.origin.url()?)?);
    let interceptor = Arc::new(Interceptor::from_config(
        fetcher,
        &config,
        Arc::new(TracingDiagnostics),
    )?);

    let listener = TcpListener::bind(&config.gateway.bind_address).await?;

    let shutdown = Shutdown::new();
    let gateway = Gateway::new(interceptor, &config.gateway);
    let server = tokio::spawn(gateway.run(listener, shutdown.subscribe()));

    wait_for_ctrl_c().await;
    shutdown.trigger();
    server.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
