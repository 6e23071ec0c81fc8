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

//! Caching layer for rendered scrape bodies.
//!
//! Collection against a cluster is slow, so a short TTL lets several
//! Prometheus servers scrape the same exporter without each triggering a
//! full cycle. A TTL of zero disables caching. The cache only memoizes pulled
//! results; nothing refreshes it in the background.

use std::sync::RwLock;
use std::time::{Duration, Instant};

/// A rendered body with its expiration time.
#[derive(Debug, Clone)]
struct CacheEntry {
    data: String,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(data: String, ttl: Duration) -> Self {
        Self {
            data,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Thread-safe cache for a single scrape endpoint.
///
/// # Example
///
/// ```
/// use emcecs_collector::ScrapeCache;
/// use std::time::Duration;
///
/// let cache = ScrapeCache::new(Duration::from_secs(10));
/// assert!(cache.get().is_none());
///
/// cache.set("emcecs_node_disks_total{node=\"10.0.0.1\"} 12\n".to_string());
/// assert!(cache.get().is_some());
/// ```
#[derive(Debug)]
pub struct ScrapeCache {
    entry: RwLock<Option<CacheEntry>>,
    ttl: Duration,
}

impl ScrapeCache {
    pub const fn new(ttl: Duration) -> Self {
        Self {
            entry: RwLock::new(None),
            ttl,
        }
    }

    /// Caching is enabled when the TTL is non-zero.
    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Gets the cached body if it exists and hasn't expired.
    pub fn get(&self) -> Option<String> {
        let guard = self.entry.read().ok()?;
        match guard.as_ref() {
            Some(entry) if !entry.is_expired() => Some(entry.data.clone()),
            _ => None,
        }
    }

    /// Stores a body. No-op when caching is disabled.
    pub fn set(&self, data: String) {
        if !self.is_enabled() {
            return;
        }
        if let Ok(mut guard) = self.entry.write() {
            *guard = Some(CacheEntry::new(data, self.ttl));
        }
    }

    /// Clears the cache, forcing a refresh on the next get.
    pub fn clear(&self) {
        if let Ok(mut guard) = self.entry.write() {
            *guard = None;
        }
    }

    /// Gets the cached body or computes and caches a fresh one.
    pub async fn get_or_compute_async<F, Fut>(&self, compute: F) -> String
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = String>,
    {
        if let Some(cached) = self.get() {
            return cached;
        }

        let data = compute().await;
        self.set(data.clone());
        data
    }
}

impl Default for ScrapeCache {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}
