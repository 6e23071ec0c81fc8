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

//! Node health and telemetry as reported by the cluster dashboard API.

use emcecs_jsonpath::{Value, get};

/// Disk inventory of a node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiskCounts {
    pub total: u64,
    pub good: u64,
    pub bad: u64,
}

/// Disk capacity of a node, in bytes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiskSpace {
    pub total_bytes: f64,
    pub free_bytes: f64,
    pub allocated_bytes: f64,
}

/// CPU and memory usage of a node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceUtilization {
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub memory_bytes: f64,
}

/// NIC throughput of a node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkStats {
    pub bandwidth_bytes_per_sec: f64,
    pub utilization_percent: f64,
}

/// Data path latency and throughput of a node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionStats {
    pub read_latency_ms: f64,
    pub write_latency_ms: f64,
    pub read_bandwidth_bytes_per_sec: f64,
    pub write_bandwidth_bytes_per_sec: f64,
}

/// Snapshot of one node's health for a single collection cycle.
///
/// Fields the dashboard did not report are zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeState {
    /// Address used as the `node` label
    pub node_address: String,
    pub disk_counts: DiskCounts,
    pub disk_space: DiskSpace,
    pub resource_utilization: ResourceUtilization,
    pub network_stats: NetworkStats,
    pub transaction_stats: TransactionStats,
    pub active_connections: u64,
}

impl NodeState {
    /// Builds a node state from a `/dashboard/nodes/{id}` document.
    ///
    /// Current values are reported as single-element time series arrays
    /// (`diskSpaceTotalCurrent: [{"Space": "..."}]`); the first sample is used.
    pub fn from_dashboard(node_address: impl Into<String>, doc: &Value) -> Self {
        let num = |path: &str| get(doc, path).as_f64();
        let count = |path: &str| get(doc, path).as_u64();

        Self {
            node_address: node_address.into(),
            disk_counts: DiskCounts {
                total: count("numDisks"),
                good: count("numGoodDisks"),
                bad: count("numBadDisks"),
            },
            disk_space: DiskSpace {
                total_bytes: num("diskSpaceTotalCurrent.0.Space"),
                free_bytes: num("diskSpaceFreeCurrent.0.Space"),
                allocated_bytes: num("diskSpaceAllocatedCurrent.0.Space"),
            },
            resource_utilization: ResourceUtilization {
                cpu_percent: num("nodeCpuUtilizationCurrent.0.Percent"),
                memory_percent: num("nodeMemoryUtilizationCurrent.0.Percent"),
                memory_bytes: num("nodeMemoryUtilizationBytesCurrent.0.Bytes"),
            },
            network_stats: NetworkStats {
                bandwidth_bytes_per_sec: num("nodeNicBandwidthCurrent.0.Bandwidth"),
                utilization_percent: num("nodeNicUtilizationCurrent.0.Percent"),
            },
            transaction_stats: TransactionStats {
                read_latency_ms: num("transactionReadLatencyCurrent.0.Latency"),
                write_latency_ms: num("transactionWriteLatencyCurrent.0.Latency"),
                read_bandwidth_bytes_per_sec: num("transactionReadBandwidthCurrent.0.Bandwidth"),
                write_bandwidth_bytes_per_sec: num("transactionWriteBandwidthCurrent.0.Bandwidth"),
            },
            active_connections: count("activeConnections"),
        }
    }
}

/// A node entry from the zone's node list
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NodeRef {
    pub id: String,
    pub address: String,
}

impl NodeRef {
    /// Reads `id` and the label address (`ip`, else `displayName`, else `id`).
    /// Entries without an id cannot be queried and are dropped.
    pub(crate) fn from_value(entry: &Value) -> Option<Self> {
        let id = get(entry, "id").as_string();
        if id.is_empty() {
            return None;
        }

        let address = ["ip", "displayName"]
            .into_iter()
            .map(|field| get(entry, field).as_string())
            .find(|value| !value.is_empty())
            .unwrap_or_else(|| id.clone());

        Some(Self { id, address })
    }
}
