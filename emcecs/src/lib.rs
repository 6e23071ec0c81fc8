// Copyright 2024 RustFS Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Prometheus exporter for ECS bucket metering and node health.

mod config;
pub mod server;

pub use config::Config;
pub use server::{AppState, build_router, serve, shutdown_signal};

use anyhow::{Context, Result};
use emcecs_client::{ClusterApi, EcsClient};
use emcecs_collector::{BucketMeteringCollector, MetricCatalog, NodeCollector, Registry, ScrapeCache};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Builds the registry with the bucket metering and node collectors.
pub fn build_registry(config: &Config, client: Option<Arc<dyn ClusterApi>>) -> Result<Registry> {
    let catalog = Arc::new(MetricCatalog::new(&config.metric_namespace, config.node_metrics));
    let mut registry = Registry::new(catalog.clone()).with_sink_capacity(config.sink_capacity);

    registry
        .register(Arc::new(
            BucketMeteringCollector::new(client.clone(), catalog.clone()).with_concurrency(config.bucket_concurrency),
        ))
        .context("Failed to register bucket metering collector")?;
    registry
        .register(Arc::new(NodeCollector::new(client, catalog)))
        .context("Failed to register node collector")?;

    Ok(registry)
}

/// Runs the exporter until a shutdown signal arrives.
pub async fn run(config: Config) -> Result<()> {
    let client = Arc::new(EcsClient::new(config.client_config()).context("Failed to create cluster client")?);

    if let Err(e) = client.login().await {
        warn!("Initial login to {} failed, retrying on first scrape: {}", client.base_url(), e);
    }

    let api: Arc<dyn ClusterApi> = client.clone();
    let registry = build_registry(&config, Some(api))?;
    let state = AppState::new(Arc::new(registry), ScrapeCache::new(*config.cache_ttl), *config.scrape_timeout);

    let listener = TcpListener::bind(config.address)
        .await
        .with_context(|| format!("Failed to bind {}", config.address))?;
    serve(listener, state, shutdown_signal())
        .await
        .context("Scrape server failed")?;

    if client.has_session().await {
        match client.logout().await {
            Ok(()) => info!("Logged out of {}", client.base_url()),
            Err(e) => warn!("Logout from {} failed: {}", client.base_url(), e),
        }
    }
    Ok(())
}
