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

//! Bucket metering collector.
//!
//! Lists the cluster's namespaces, then queries the billing info of each
//! namespace with at most `concurrency` queries in flight.

use super::{Collector, join_all};
use crate::{ConcurrencyGate, Measurement, MetricCatalog, MetricDesc, MetricSink};
use async_trait::async_trait;
use emcecs_client::{ClientError, ClusterApi};
use emcecs_config::{BUCKET_BILLING_PATH_PREFIX, DEFAULT_BUCKET_CONCURRENCY, GB_TO_BYTES, NAMESPACES_PATH};
use emcecs_jsonpath::{Value, get};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::OwnedSemaphorePermit;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

/// Request body selecting every bucket of a namespace, sizes in GB
pub const BILLING_REQUEST_BODY: &str = r#"{"bucketName":"*","sizeunit":"GB"}"#;

/// Billing figures of one bucket.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BucketBillingRecord {
    pub namespace: String,
    pub bucket_name: String,
    pub object_count: u64,
    pub total_size_bytes: f64,
    pub ingress_bytes: f64,
    pub egress_bytes: f64,
}

impl BucketBillingRecord {
    /// Decodes one element of `bucket_billing_info`.
    ///
    /// Returns `None` for an element without a bucket name. Missing or
    /// malformed numbers read as zero.
    pub fn from_entry(namespace: &str, entry: &Value) -> Option<Self> {
        let bucket_name = get(entry, "name").as_string();
        if bucket_name.is_empty() {
            return None;
        }

        let non_negative = |path: &str| get(entry, path).as_f64().max(0.0);
        Some(Self {
            namespace: namespace.to_string(),
            bucket_name,
            object_count: get(entry, "total_objects").as_u64(),
            total_size_bytes: non_negative("total_size") * GB_TO_BYTES,
            ingress_bytes: non_negative("ingress_bytes"),
            egress_bytes: non_negative("egress_bytes"),
        })
    }

    fn measurements(&self, catalog: &MetricCatalog) -> crate::Result<Vec<Measurement>> {
        let labels = || vec![self.namespace.clone(), self.bucket_name.clone()];
        let bucket = &catalog.bucket;
        Ok(vec![
            Measurement::new(&bucket.object_count, self.object_count as f64, labels())?,
            Measurement::new(&bucket.size_bytes, self.total_size_bytes, labels())?,
            Measurement::new(&bucket.ingress_bytes, self.ingress_bytes, labels())?,
            Measurement::new(&bucket.egress_bytes, self.egress_bytes, labels())?,
        ])
    }
}

/// Extracts namespace names from a `/object/namespaces` body.
pub fn parse_namespaces(body: &str) -> emcecs_jsonpath::Result<Vec<String>> {
    let doc = emcecs_jsonpath::parse(body)?;
    Ok(get(&doc, "namespace.#.name")
        .strings()
        .into_iter()
        .filter(|name| !name.is_empty())
        .collect())
}

/// Decodes every bucket of a billing response, element by element.
pub fn parse_billing(namespace: &str, body: &str) -> emcecs_jsonpath::Result<Vec<BucketBillingRecord>> {
    let doc = emcecs_jsonpath::parse(body)?;
    let info = get(&doc, "bucket_billing_info");
    let entries = info.array();
    let records: Vec<BucketBillingRecord> = entries
        .iter()
        .filter_map(|entry| BucketBillingRecord::from_entry(namespace, entry))
        .collect();

    if records.len() < entries.len() {
        debug!(namespace, "Skipped {} billing entries without a bucket name", entries.len() - records.len());
    }
    Ok(records)
}

fn billing_path(namespace: &str) -> String {
    format!("{}/{}/info", BUCKET_BILLING_PATH_PREFIX, urlencoding::encode(namespace))
}

/// Collects per-bucket object count, size, ingress and egress.
///
/// # Metrics Produced
///
/// Labeled `[namespace, bucket]`:
///
/// - `{prefix}_metering_bucket_object_count` (gauge)
/// - `{prefix}_metering_bucket_size_bytes` (gauge)
/// - `{prefix}_metering_bucket_ingress_bytes_total` (counter)
/// - `{prefix}_metering_bucket_egress_bytes_total` (counter)
pub struct BucketMeteringCollector {
    client: Option<Arc<dyn ClusterApi>>,
    catalog: Arc<MetricCatalog>,
    concurrency: usize,
}

impl BucketMeteringCollector {
    pub fn new(client: Option<Arc<dyn ClusterApi>>, catalog: Arc<MetricCatalog>) -> Self {
        Self {
            client,
            catalog,
            concurrency: DEFAULT_BUCKET_CONCURRENCY,
        }
    }

    /// Sets the number of namespace queries allowed in flight
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    async fn list_namespaces(&self, client: &dyn ClusterApi) -> Result<Vec<String>, ClientError> {
        let body = client.get(NAMESPACES_PATH).await?;
        parse_namespaces(&body).map_err(ClientError::from)
    }
}

impl std::fmt::Debug for BucketMeteringCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BucketMeteringCollector")
            .field("cluster", &self.client.as_ref().map(|c| c.cluster_address().to_string()))
            .field("concurrency", &self.concurrency)
            .finish()
    }
}

#[async_trait]
impl Collector for BucketMeteringCollector {
    fn name(&self) -> &'static str {
        "bucket_metering"
    }

    fn describe(&self) -> Vec<Arc<MetricDesc>> {
        self.catalog.bucket.descs()
    }

    async fn collect(&self, sink: &MetricSink, cancel: &CancellationToken) {
        let Some(client) = self.client.clone() else {
            error!("Bucket metering skipped: no cluster client configured");
            return;
        };
        let start = Instant::now();

        let listed = tokio::select! {
            listed = self.list_namespaces(client.as_ref()) => listed,
            _ = cancel.cancelled() => {
                warn!(cluster = client.cluster_address(), "Bucket metering cancelled while listing namespaces");
                return;
            }
        };
        let namespaces = match listed {
            Ok(namespaces) => namespaces,
            Err(e) => {
                error!(cluster = client.cluster_address(), "Error getting namespace list: {}", e);
                return;
            }
        };
        debug!(cluster = client.cluster_address(), "Found {} namespaces", namespaces.len());

        let gate = ConcurrencyGate::new(self.concurrency);
        let mut tasks = JoinSet::new();
        let total = namespaces.len();

        for (dispatched, namespace) in namespaces.into_iter().enumerate() {
            let Some(permit) = gate.acquire(cancel).await else {
                warn!(
                    cluster = client.cluster_address(),
                    "Bucket metering cancelled, {} of {} namespaces not queried",
                    total - dispatched,
                    total
                );
                break;
            };
            tasks.spawn(collect_namespace(client.clone(), self.catalog.clone(), sink.clone(), namespace, permit));
        }

        join_all(&mut tasks, cancel, self.name()).await;
        gate.drain().await;

        debug!(
            "Scrape of bucket metering took {:.3} seconds for cluster {}",
            start.elapsed().as_secs_f64(),
            client.cluster_address()
        );
    }
}

async fn collect_namespace(
    client: Arc<dyn ClusterApi>,
    catalog: Arc<MetricCatalog>,
    sink: MetricSink,
    namespace: String,
    permit: OwnedSemaphorePermit,
) {
    let records = {
        let _permit = permit;
        let body = match client.post(&billing_path(&namespace), BILLING_REQUEST_BODY).await {
            Ok(body) => body,
            Err(e) => {
                error!(namespace = %namespace, "Error getting bucket billing info: {}", e);
                return;
            }
        };
        match parse_billing(&namespace, &body) {
            Ok(records) => records,
            Err(e) => {
                error!(namespace = %namespace, "Error parsing bucket billing info: {}", e);
                return;
            }
        }
    };

    for record in records {
        let measurements = match record.measurements(&catalog) {
            Ok(measurements) => measurements,
            Err(e) => {
                error!(namespace = %namespace, bucket = %record.bucket_name, "Failed to build bucket measurements: {}", e);
                continue;
            }
        };
        if !sink.emit(measurements).await {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_billing_record_from_entry() {
        let entry = json!({
            "name": "b1",
            "total_objects": 10,
            "total_size": "2.5",
            "ingress_bytes": 100,
            "egress_bytes": "50"
        });
        let record = BucketBillingRecord::from_entry("ns1", &entry).unwrap();
        assert_eq!(record.namespace, "ns1");
        assert_eq!(record.bucket_name, "b1");
        assert_eq!(record.object_count, 10);
        assert_eq!(record.total_size_bytes, 2.5e9);
        assert_eq!(record.ingress_bytes, 100.0);
        assert_eq!(record.egress_bytes, 50.0);
    }

    #[test]
    fn test_missing_fields_read_as_zero() {
        let entry = json!({"name": "b1", "total_size": "n/a", "egress_bytes": -3});
        let record = BucketBillingRecord::from_entry("ns1", &entry).unwrap();
        assert_eq!(record.object_count, 0);
        assert_eq!(record.total_size_bytes, 0.0);
        assert_eq!(record.ingress_bytes, 0.0);
        assert_eq!(record.egress_bytes, 0.0);
    }

    #[test]
    fn test_entry_without_name_is_skipped() {
        assert!(BucketBillingRecord::from_entry("ns1", &json!({"total_objects": 3})).is_none());
    }

    #[test]
    fn test_parse_billing_decodes_every_element() {
        let body = r#"{"bucket_billing_info":[
            {"name":"b1","total_objects":1,"total_size":5},
            {"total_objects":2},
            {"name":"b2","total_objects":3,"total_size":0.5}
        ]}"#;
        let records = parse_billing("ns1", body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].bucket_name, "b1");
        assert_eq!(records[0].total_size_bytes, 5_000_000_000.0);
        assert_eq!(records[1].bucket_name, "b2");
        assert_eq!(records[1].object_count, 3);
        assert_eq!(records[1].total_size_bytes, 500_000_000.0);
    }

    #[test]
    fn test_parse_billing_without_info_is_empty() {
        assert!(parse_billing("ns1", "{}").unwrap().is_empty());
        assert!(parse_billing("ns1", "not json").is_err());
    }

    #[test]
    fn test_parse_namespaces() {
        let body = r#"{"namespace":[{"name":"ns1","id":"ns1"},{"id":"x"},{"name":"ns2"}]}"#;
        assert_eq!(parse_namespaces(body).unwrap(), vec!["ns1", "ns2"]);
        assert!(parse_namespaces(r#"{"namespace":[]}"#).unwrap().is_empty());
        assert!(parse_namespaces("<html>").is_err());
    }

    #[test]
    fn test_billing_path() {
        assert_eq!(billing_path("ns1"), "/object/billing/buckets/ns1/info");
        assert_eq!(billing_path("team-a_1"), "/object/billing/buckets/team-a_1/info");
        assert_eq!(billing_path("a b/c#d?e"), "/object/billing/buckets/a%20b%2Fc%23d%3Fe/info");
    }

    #[test]
    fn test_record_measurements() {
        let catalog = MetricCatalog::default();
        let record = BucketBillingRecord {
            namespace: "ns1".to_string(),
            bucket_name: "b1".to_string(),
            object_count: 10,
            total_size_bytes: 2e9,
            ingress_bytes: 100.0,
            egress_bytes: 50.0,
        };
        let measurements = record.measurements(&catalog).unwrap();
        let values: Vec<f64> = measurements.iter().map(Measurement::value).collect();
        assert_eq!(values, vec![10.0, 2e9, 100.0, 50.0]);
        assert!(measurements.iter().all(|m| m.label("namespace") == Some("ns1") && m.label("bucket") == Some("b1")));
    }
}
