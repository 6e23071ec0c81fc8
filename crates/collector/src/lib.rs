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

//! Collection engine for the ECS exporter.
//!
//! Collectors query a cluster through [`emcecs_client::ClusterApi`] and write
//! [`Measurement`]s into a bounded [`MetricSink`]. The [`Registry`] runs every
//! collector on each scrape, drains their output and hands it to
//! [`render_metrics`].
//!
//! Sub-queries are fanned out under a [`ConcurrencyGate`]; no collector writes
//! to its sink after `collect` returns, including when the scrape is cancelled.

mod cache;
mod catalog;
pub mod collectors;
mod error;
mod format;
mod gate;
mod measurement;
mod metric_type;
mod registry;
pub mod sink;

pub use cache::ScrapeCache;
pub use catalog::{BucketMetrics, MetricCatalog, MetricDesc, NodeField, NodeMetricSet, build_fq_name, is_valid_metric_prefix};
pub use collectors::{BucketMeteringCollector, Collector, NodeCollector};
pub use error::{CollectorError, Result};
pub use format::render_metrics;
pub use gate::ConcurrencyGate;
pub use measurement::Measurement;
pub use metric_type::MetricType;
pub use registry::Registry;
pub use sink::{MetricSink, MetricStream};
