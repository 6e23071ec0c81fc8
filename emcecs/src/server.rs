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

//! HTTP scrape endpoint.

use axum::Router;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use emcecs_collector::{Registry, ScrapeCache, render_metrics};
use emcecs_config::{HEALTH_PATH, METRICS_PATH, PROMETHEUS_CONTENT_TYPE};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Shared state of the scrape handlers
#[derive(Clone)]
pub struct AppState {
    registry: Arc<Registry>,
    cache: Arc<ScrapeCache>,
    scrape_timeout: Duration,
}

impl AppState {
    pub fn new(registry: Arc<Registry>, cache: ScrapeCache, scrape_timeout: Duration) -> Self {
        Self {
            registry,
            cache: Arc::new(cache),
            scrape_timeout,
        }
    }

    /// Runs one collection cycle and renders it.
    ///
    /// Collection is cancelled once `scrape_timeout` elapses; whatever was
    /// collected by then is rendered. Only complete scrapes are cached.
    pub async fn scrape(&self) -> String {
        if let Some(body) = self.cache.get() {
            debug!("Serving cached scrape");
            return body;
        }

        let start = Instant::now();
        let cancel = CancellationToken::new();
        let gather = self.registry.gather(&cancel);
        tokio::pin!(gather);

        let measurements = tokio::select! {
            measurements = &mut gather => measurements,
            _ = tokio::time::sleep(self.scrape_timeout) => {
                warn!("Scrape exceeded {:?}, cancelling collection", self.scrape_timeout);
                cancel.cancel();
                gather.await
            }
        };

        let body = render_metrics(&measurements);
        if !cancel.is_cancelled() {
            self.cache.set(body.clone());
        }
        debug!("Scrape of {} measurements took {:.3} seconds", measurements.len(), start.elapsed().as_secs_f64());
        body
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("registry", &self.registry)
            .field("cache_ttl", &self.cache.ttl())
            .field("scrape_timeout", &self.scrape_timeout)
            .finish()
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(METRICS_PATH, get(metrics_handler))
        .route(HEALTH_PATH, get(health_handler))
        .with_state(state)
}

async fn metrics_handler(State(state): State<AppState>) -> Response {
    let body = state.scrape().await;
    ([(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)], body).into_response()
}

async fn health_handler() -> &'static str {
    "ok"
}

/// Serves the scrape endpoint until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!("Serving metrics on http://{}{}", addr, METRICS_PATH);
    }
    axum::serve(listener, build_router(state)).with_graceful_shutdown(shutdown).await
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
