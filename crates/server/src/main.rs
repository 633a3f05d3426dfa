//! groupie MCP server entry point.
//!
//! This is the main binary that loads configuration, warms the artist
//! snapshot and boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use anyhow::{Context, Result};
use groupie_client::{CachedGeocoder, MapboxConfig, MapboxGeocoder, UpstreamClient, UpstreamConfig};
use groupie_core::{AppConfig, DataSource, DetailAssembler, DisabledGeocoder, Geocoder, SnapshotCache};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load().context("loading configuration")?;

    tracing::info!(
        refresh_interval_secs = config.refresh_interval_secs,
        policy = ?config.refresh_policy,
        "Starting groupie-mcp server on stdio transport"
    );

    let upstream = UpstreamClient::new(UpstreamConfig::from(&config))?;
    let source: Arc<dyn DataSource> = Arc::new(upstream);
    let cache = SnapshotCache::with_policy(source, config.refresh_interval(), config.refresh_policy);

    let snapshot = cache.refresh().await.context("initial snapshot fetch failed")?;
    tracing::info!(artists = snapshot.len(), "initial snapshot loaded");

    let geocoder = build_geocoder(&config)?;
    let assembler = DetailAssembler::new(geocoder).with_concurrency(config.geocode_concurrency);

    let handler = handler::GroupieServer::new(cache, assembler);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}

/// Mapbox behind a memoizing cache when a token is configured, otherwise a
/// geocoder that resolves nothing.
fn build_geocoder(config: &AppConfig) -> Result<Arc<dyn Geocoder>> {
    let Ok(mapbox) = MapboxConfig::from_app_config(config) else {
        tracing::warn!("GROUPIE_MAPBOX_ACCESS_TOKEN not set; artist details will carry no coordinates");
        return Ok(Arc::new(DisabledGeocoder));
    };

    let ttl = config.geocode_cache_ttl();
    let geocoder = Arc::new(CachedGeocoder::with_ttl(MapboxGeocoder::new(mapbox)?, ttl));

    let sweeper = Arc::clone(&geocoder);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(ttl.max(Duration::from_secs(60)));
        ticker.tick().await;
        loop {
            ticker.tick().await;
            sweeper.cleanup_expired().await;
        }
    });

    Ok(geocoder as Arc<dyn Geocoder>)
}
