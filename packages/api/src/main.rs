use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use proxycache::ProxyBuilder;
use proxycache::cli::Cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Cli::parse()
        .into_config()
        .context("loading configuration")?;
    let proxy = ProxyBuilder::from_config(config)
        .build()
        .context("invalid configuration")?;
    let forwarder = Arc::clone(proxy.forwarder());

    proxy
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(target: "proxycache", "Cannot listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
        .context("proxy stopped")?;

    let cache = forwarder.cache().stats().snapshot();
    tracing::info!(
        target: "proxycache",
        proxy = ?forwarder.stats().snapshot(),
        cache = ?cache,
        hit_ratio = forwarder.cache().stats().hit_ratio(),
        "Shutting down"
    );

    Ok(())
}
