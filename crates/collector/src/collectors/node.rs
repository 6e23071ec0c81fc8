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

use super::Collector;
use crate::{Measurement, MetricCatalog, MetricDesc, MetricSink};
use async_trait::async_trait;
use emcecs_client::{ClusterApi, NodeState};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

/// Collects the health gauges of every node in the local zone, labeled `[node]`.
///
/// Which gauges are emitted follows the catalog's node metric set.
pub struct NodeCollector {
    client: Option<Arc<dyn ClusterApi>>,
    catalog: Arc<MetricCatalog>,
}

impl NodeCollector {
    pub fn new(client: Option<Arc<dyn ClusterApi>>, catalog: Arc<MetricCatalog>) -> Self {
        Self { client, catalog }
    }

    fn measurements(&self, state: &NodeState) -> Vec<Measurement> {
        self.catalog
            .node_metrics()
            .iter()
            .filter_map(|(field, desc)| {
                Measurement::new(desc, field.value(state), vec![state.node_address.clone()])
                    .map_err(|e| error!(node = %state.node_address, "Failed to build node measurement: {}", e))
                    .ok()
            })
            .collect()
    }
}

impl std::fmt::Debug for NodeCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeCollector")
            .field("cluster", &self.client.as_ref().map(|c| c.cluster_address().to_string()))
            .field("node_set", &self.catalog.node_set())
            .finish()
    }
}

#[async_trait]
impl Collector for NodeCollector {
    fn name(&self) -> &'static str {
        "node"
    }

    fn describe(&self) -> Vec<Arc<MetricDesc>> {
        self.catalog.node_descs()
    }

    async fn collect(&self, sink: &MetricSink, cancel: &CancellationToken) {
        let Some(client) = self.client.as_ref() else {
            error!("Node collection skipped: no cluster client configured");
            return;
        };
        let start = Instant::now();

        let retrieved = tokio::select! {
            retrieved = client.retrieve_node_states() => retrieved,
            _ = cancel.cancelled() => {
                warn!(cluster = client.cluster_address(), "Node collection cancelled while retrieving node states");
                return;
            }
        };
        let states = match retrieved {
            Ok(states) => states,
            Err(e) => {
                error!(cluster = client.cluster_address(), "Error retrieving node states: {}", e);
                return;
            }
        };
        if states.is_empty() {
            warn!(cluster = client.cluster_address(), "No node states retrieved");
            return;
        }

        for state in &states {
            if !sink.emit(self.measurements(state)).await {
                return;
            }
        }

        debug!(
            "Scrape of {} nodes took {:.3} seconds for cluster {}",
            states.len(),
            start.elapsed().as_secs_f64(),
            client.cluster_address()
        );
    }
}
