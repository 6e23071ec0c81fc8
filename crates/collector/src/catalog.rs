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

//! Immutable metric descriptors.
//!
//! The catalog is built once at startup from the configured prefix and node
//! metric set, then shared as an `Arc` by every collector and the registry.

use crate::MetricType;
use emcecs_client::NodeState;
use emcecs_config::DEFAULT_METRIC_NAMESPACE;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

const BUCKET_SUBSYSTEM: &str = "metering_bucket";
const NODE_SUBSYSTEM: &str = "node";
const EXPORTER_SUBSYSTEM: &str = "exporter";

const BUCKET_LABELS: &[&str] = &["namespace", "bucket"];
const NODE_LABELS: &[&str] = &["node"];
const COLLECTOR_LABELS: &[&str] = &["collector"];

/// Joins the non-empty parts of a metric name with `_`.
pub fn build_fq_name(namespace: &str, subsystem: &str, name: &str) -> String {
    [namespace, subsystem, name]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("_")
}

/// Whether `prefix` can start a metric name: `[a-zA-Z_][a-zA-Z0-9_]*`.
pub fn is_valid_metric_prefix(prefix: &str) -> bool {
    let mut chars = prefix.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => chars.all(|c| c.is_ascii_alphanumeric() || c == '_'),
        _ => false,
    }
}

/// Name, kind, help and label schema of one exported metric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDesc {
    fq_name: String,
    help: &'static str,
    metric_type: MetricType,
    label_names: &'static [&'static str],
}

impl MetricDesc {
    pub fn new(fq_name: impl Into<String>, help: &'static str, metric_type: MetricType, label_names: &'static [&'static str]) -> Self {
        Self {
            fq_name: fq_name.into(),
            help,
            metric_type,
            label_names,
        }
    }

    pub fn fq_name(&self) -> &str {
        &self.fq_name
    }

    pub fn help(&self) -> &str {
        self.help
    }

    pub fn metric_type(&self) -> MetricType {
        self.metric_type
    }

    pub fn label_names(&self) -> &[&'static str] {
        self.label_names
    }
}

/// Which node metrics are exported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NodeMetricSet {
    /// Disk counts, disk space and active connections
    Reduced,
    /// Every node metric the dashboard reports
    #[default]
    Extended,
}

impl NodeMetricSet {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reduced => "reduced",
            Self::Extended => "extended",
        }
    }
}

impl fmt::Display for NodeMetricSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeMetricSet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reduced" => Ok(Self::Reduced),
            "extended" => Ok(Self::Extended),
            other => Err(format!("unknown node metric set '{other}', expected 'reduced' or 'extended'")),
        }
    }
}

/// One node gauge and where its value comes from in a [`NodeState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeField {
    DisksTotal,
    DisksGood,
    DisksBad,
    DiskSpaceTotalBytes,
    DiskSpaceFreeBytes,
    DiskSpaceAllocatedBytes,
    CpuUtilizationPercent,
    MemoryUtilizationPercent,
    MemoryUtilizationBytes,
    NicBandwidthBytesPerSec,
    NicUtilizationPercent,
    TransactionReadLatencyMs,
    TransactionWriteLatencyMs,
    TransactionReadBandwidthBytesPerSec,
    TransactionWriteBandwidthBytesPerSec,
    ActiveConnections,
}

impl NodeField {
    /// Every node metric, in export order
    pub const ALL: [NodeField; 16] = [
        Self::DisksTotal,
        Self::DisksGood,
        Self::DisksBad,
        Self::DiskSpaceTotalBytes,
        Self::DiskSpaceFreeBytes,
        Self::DiskSpaceAllocatedBytes,
        Self::CpuUtilizationPercent,
        Self::MemoryUtilizationPercent,
        Self::MemoryUtilizationBytes,
        Self::NicBandwidthBytesPerSec,
        Self::NicUtilizationPercent,
        Self::TransactionReadLatencyMs,
        Self::TransactionWriteLatencyMs,
        Self::TransactionReadBandwidthBytesPerSec,
        Self::TransactionWriteBandwidthBytesPerSec,
        Self::ActiveConnections,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::DisksTotal => "disks_total",
            Self::DisksGood => "disks_good",
            Self::DisksBad => "disks_bad",
            Self::DiskSpaceTotalBytes => "disk_space_total_bytes",
            Self::DiskSpaceFreeBytes => "disk_space_free_bytes",
            Self::DiskSpaceAllocatedBytes => "disk_space_allocated_bytes",
            Self::CpuUtilizationPercent => "cpu_utilization_percent",
            Self::MemoryUtilizationPercent => "memory_utilization_percent",
            Self::MemoryUtilizationBytes => "memory_utilization_bytes",
            Self::NicBandwidthBytesPerSec => "nic_bandwidth_bytes_per_sec",
            Self::NicUtilizationPercent => "nic_utilization_percent",
            Self::TransactionReadLatencyMs => "transaction_read_latency_ms",
            Self::TransactionWriteLatencyMs => "transaction_write_latency_ms",
            Self::TransactionReadBandwidthBytesPerSec => "transaction_read_bandwidth_bytes_per_sec",
            Self::TransactionWriteBandwidthBytesPerSec => "transaction_write_bandwidth_bytes_per_sec",
            Self::ActiveConnections => "active_connections",
        }
    }

    pub fn help(&self) -> &'static str {
        match self {
            Self::DisksTotal => "Number of disks attached to the node",
            Self::DisksGood => "Number of healthy disks on the node",
            Self::DisksBad => "Number of failed disks on the node",
            Self::DiskSpaceTotalBytes => "Total disk capacity of the node in bytes",
            Self::DiskSpaceFreeBytes => "Free disk capacity of the node in bytes",
            Self::DiskSpaceAllocatedBytes => "Allocated disk capacity of the node in bytes",
            Self::CpuUtilizationPercent => "CPU utilization of the node in percent",
            Self::MemoryUtilizationPercent => "Memory utilization of the node in percent",
            Self::MemoryUtilizationBytes => "Memory in use on the node in bytes",
            Self::NicBandwidthBytesPerSec => "NIC bandwidth of the node in bytes per second",
            Self::NicUtilizationPercent => "NIC utilization of the node in percent",
            Self::TransactionReadLatencyMs => "Read transaction latency of the node in milliseconds",
            Self::TransactionWriteLatencyMs => "Write transaction latency of the node in milliseconds",
            Self::TransactionReadBandwidthBytesPerSec => "Read transaction bandwidth of the node in bytes per second",
            Self::TransactionWriteBandwidthBytesPerSec => "Write transaction bandwidth of the node in bytes per second",
            Self::ActiveConnections => "Number of active client connections on the node",
        }
    }

    /// Whether the metric is exported with [`NodeMetricSet::Reduced`]
    pub fn in_reduced_set(&self) -> bool {
        matches!(
            self,
            Self::DisksTotal
                | Self::DisksGood
                | Self::DisksBad
                | Self::DiskSpaceTotalBytes
                | Self::DiskSpaceFreeBytes
                | Self::DiskSpaceAllocatedBytes
                | Self::ActiveConnections
        )
    }

    pub fn value(&self, state: &NodeState) -> f64 {
        match self {
            Self::DisksTotal => state.disk_counts.total as f64,
            Self::DisksGood => state.disk_counts.good as f64,
            Self::DisksBad => state.disk_counts.bad as f64,
            Self::DiskSpaceTotalBytes => state.disk_space.total_bytes,
            Self::DiskSpaceFreeBytes => state.disk_space.free_bytes,
            Self::DiskSpaceAllocatedBytes => state.disk_space.allocated_bytes,
            Self::CpuUtilizationPercent => state.resource_utilization.cpu_percent,
            Self::MemoryUtilizationPercent => state.resource_utilization.memory_percent,
            Self::MemoryUtilizationBytes => state.resource_utilization.memory_bytes,
            Self::NicBandwidthBytesPerSec => state.network_stats.bandwidth_bytes_per_sec,
            Self::NicUtilizationPercent => state.network_stats.utilization_percent,
            Self::TransactionReadLatencyMs => state.transaction_stats.read_latency_ms,
            Self::TransactionWriteLatencyMs => state.transaction_stats.write_latency_ms,
            Self::TransactionReadBandwidthBytesPerSec => state.transaction_stats.read_bandwidth_bytes_per_sec,
            Self::TransactionWriteBandwidthBytesPerSec => state.transaction_stats.write_bandwidth_bytes_per_sec,
            Self::ActiveConnections => state.active_connections as f64,
        }
    }
}

/// Descriptors of the bucket metering metrics, labeled `[namespace, bucket]`.
#[derive(Debug)]
pub struct BucketMetrics {
    pub object_count: Arc<MetricDesc>,
    pub size_bytes: Arc<MetricDesc>,
    pub ingress_bytes: Arc<MetricDesc>,
    pub egress_bytes: Arc<MetricDesc>,
}

impl BucketMetrics {
    fn new(namespace: &str) -> Self {
        let desc = |name: &str, help: &'static str, metric_type: MetricType| {
            Arc::new(MetricDesc::new(
                build_fq_name(namespace, BUCKET_SUBSYSTEM, name),
                help,
                metric_type,
                BUCKET_LABELS,
            ))
        };
        Self {
            object_count: desc("object_count", "Number of objects stored in the bucket", MetricType::Gauge),
            size_bytes: desc("size_bytes", "Total size of the objects in the bucket in bytes", MetricType::Gauge),
            ingress_bytes: desc("ingress_bytes_total", "Bytes written into the bucket", MetricType::Counter),
            egress_bytes: desc("egress_bytes_total", "Bytes read from the bucket", MetricType::Counter),
        }
    }

    pub fn descs(&self) -> Vec<Arc<MetricDesc>> {
        vec![
            self.object_count.clone(),
            self.size_bytes.clone(),
            self.ingress_bytes.clone(),
            self.egress_bytes.clone(),
        ]
    }
}

/// Every descriptor the exporter can emit.
#[derive(Debug)]
pub struct MetricCatalog {
    namespace: String,
    node_set: NodeMetricSet,
    pub bucket: BucketMetrics,
    node: Vec<(NodeField, Arc<MetricDesc>)>,
    /// `{prefix}_exporter_collector_duration_seconds`, labeled `[collector]`
    pub collector_duration: Arc<MetricDesc>,
}

impl MetricCatalog {
    pub fn new(namespace: &str, node_set: NodeMetricSet) -> Self {
        let node = NodeField::ALL
            .iter()
            .filter(|field| node_set == NodeMetricSet::Extended || field.in_reduced_set())
            .map(|field| {
                let desc = MetricDesc::new(
                    build_fq_name(namespace, NODE_SUBSYSTEM, field.name()),
                    field.help(),
                    MetricType::Gauge,
                    NODE_LABELS,
                );
                (*field, Arc::new(desc))
            })
            .collect();

        Self {
            namespace: namespace.to_string(),
            node_set,
            bucket: BucketMetrics::new(namespace),
            node,
            collector_duration: Arc::new(MetricDesc::new(
                build_fq_name(namespace, EXPORTER_SUBSYSTEM, "collector_duration_seconds"),
                "Time a collector spent in its last collection cycle",
                MetricType::Gauge,
                COLLECTOR_LABELS,
            )),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn node_set(&self) -> NodeMetricSet {
        self.node_set
    }

    /// Node metrics of the configured set, in export order
    pub fn node_metrics(&self) -> &[(NodeField, Arc<MetricDesc>)] {
        &self.node
    }

    pub fn node_descs(&self) -> Vec<Arc<MetricDesc>> {
        self.node.iter().map(|(_, desc)| desc.clone()).collect()
    }
}

impl Default for MetricCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_METRIC_NAMESPACE, NodeMetricSet::default())
    }
}
