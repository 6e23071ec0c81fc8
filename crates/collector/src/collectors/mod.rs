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

//! Collectors that turn cluster API responses into measurements.
//!
//! - [`BucketMeteringCollector`]: per-bucket billing, one sub-query per namespace
//! - [`NodeCollector`]: disk, capacity and load figures per node

mod bucket;
mod node;

pub use bucket::{BILLING_REQUEST_BODY, BucketBillingRecord, BucketMeteringCollector, parse_billing, parse_namespaces};
pub use node::NodeCollector;

use crate::{MetricDesc, MetricSink};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// A source of measurements.
///
/// `collect` never fails: errors are logged and the affected entities simply
/// produce no measurements. It must not write to `sink` after returning.
#[async_trait]
pub trait Collector: Send + Sync {
    /// Short name, used as the `collector` label of the duration gauge
    fn name(&self) -> &'static str;

    /// Every descriptor this collector may emit, whether or not data is available
    fn describe(&self) -> Vec<Arc<MetricDesc>>;

    async fn collect(&self, sink: &MetricSink, cancel: &CancellationToken);
}

/// Awaits every task in `tasks`.
///
/// When `cancel` fires first, the remaining tasks are aborted and still
/// awaited, so nothing they own outlives this call.
pub(crate) async fn join_all(tasks: &mut JoinSet<()>, cancel: &CancellationToken, collector: &'static str) {
    let mut aborted = false;
    loop {
        let joined = if aborted {
            tasks.join_next().await
        } else {
            tokio::select! {
                joined = tasks.join_next() => joined,
                _ = cancel.cancelled() => {
                    warn!(collector, "Collection cancelled, aborting {} outstanding tasks", tasks.len());
                    tasks.abort_all();
                    aborted = true;
                    continue;
                }
            }
        };

        match joined {
            None => break,
            Some(Ok(())) => {}
            Some(Err(e)) if e.is_panic() => warn!(collector, "Collection task panicked: {}", e),
            Some(Err(_)) => {}
        }
    }
}
