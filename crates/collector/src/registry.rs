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

use crate::error::{CollectorError, Result};
use crate::{Collector, Measurement, MetricCatalog, MetricDesc, sink};
use emcecs_config::DEFAULT_SINK_CAPACITY;
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// The set of collectors behind one scrape endpoint.
///
/// Every fully-qualified metric name belongs to exactly one collector, or to
/// the registry itself for the per-collector duration gauge.
pub struct Registry {
    catalog: Arc<MetricCatalog>,
    collectors: Vec<Arc<dyn Collector>>,
    names: HashSet<String>,
    sink_capacity: usize,
}

impl Registry {
    pub fn new(catalog: Arc<MetricCatalog>) -> Self {
        let mut names = HashSet::new();
        names.insert(catalog.collector_duration.fq_name().to_string());
        Self {
            catalog,
            collectors: Vec::new(),
            names,
            sink_capacity: DEFAULT_SINK_CAPACITY,
        }
    }

    /// Sets how many measurements may queue before collectors wait
    pub fn with_sink_capacity(mut self, capacity: usize) -> Self {
        self.sink_capacity = capacity.max(1);
        self
    }

    /// Adds a collector, rejecting it if any of its metric names is taken.
    ///
    /// On error the registry is left unchanged.
    pub fn register(&mut self, collector: Arc<dyn Collector>) -> Result<()> {
        let mut incoming = HashSet::new();
        for desc in collector.describe() {
            let name = desc.fq_name().to_string();
            if self.names.contains(&name) || !incoming.insert(name.clone()) {
                return Err(CollectorError::DuplicateDescriptor(name));
            }
        }

        info!(collector = collector.name(), "Registered collector with {} metrics", incoming.len());
        self.names.extend(incoming);
        self.collectors.push(collector);
        Ok(())
    }

    /// Every descriptor the registry can emit
    pub fn describe(&self) -> Vec<Arc<MetricDesc>> {
        let mut descs: Vec<Arc<MetricDesc>> = self.collectors.iter().flat_map(|c| c.describe()).collect();
        descs.push(self.catalog.collector_duration.clone());
        descs
    }

    pub fn len(&self) -> usize {
        self.collectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collectors.is_empty()
    }

    /// Runs one collection cycle across all collectors.
    ///
    /// Collectors run concurrently while their output is drained. Returns once
    /// every collector has returned, which after `cancel` fires is as soon as
    /// each has aborted its outstanding work.
    pub async fn gather(&self, cancel: &CancellationToken) -> Vec<Measurement> {
        let (sink, stream) = sink::channel(self.sink_capacity);
        let duration_desc = &self.catalog.collector_duration;

        let produce = async move {
            let runs = self.collectors.iter().map(|collector| {
                let sink = sink.clone();
                async move {
                    let start = Instant::now();
                    collector.collect(&sink, cancel).await;
                    let elapsed = start.elapsed().as_secs_f64();
                    debug!(collector = collector.name(), "Collection finished in {:.3} seconds", elapsed);

                    match Measurement::new(duration_desc, elapsed, vec![collector.name().to_string()]) {
                        Ok(m) => {
                            sink.emit([m]).await;
                        }
                        Err(e) => error!(collector = collector.name(), "Failed to record collection duration: {}", e),
                    }
                }
            });
            join_all(runs).await;
        };

        let ((), measurements) = tokio::join!(produce, stream.collect());
        measurements
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("collectors", &self.collectors.iter().map(|c| c.name()).collect::<Vec<_>>())
            .field("sink_capacity", &self.sink_capacity)
            .finish()
    }
}
