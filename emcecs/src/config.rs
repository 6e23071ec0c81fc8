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

use anyhow::Result;
use clap::Parser;
use emcecs_client::ClientConfig;
use emcecs_collector::{NodeMetricSet, is_valid_metric_prefix};
use emcecs_config::{
    DEFAULT_ADDRESS, DEFAULT_BUCKET_CONCURRENCY, DEFAULT_CACHE_TTL_SECS, DEFAULT_LOG_LEVEL, DEFAULT_METRIC_NAMESPACE,
    DEFAULT_MGMT_PORT, DEFAULT_NODE_CONCURRENCY, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SCRAPE_TIMEOUT_SECS, DEFAULT_SINK_CAPACITY,
    ENV_ADDRESS, ENV_BUCKET_CONCURRENCY, ENV_CACHE_TTL, ENV_CLUSTER_ADDRESS, ENV_INSECURE_HTTP, ENV_LOG_JSON, ENV_LOG_LEVEL,
    ENV_METRIC_NAMESPACE, ENV_MGMT_PORT, ENV_NODE_CONCURRENCY, ENV_NODE_METRICS, ENV_PASSWORD, ENV_REQUEST_TIMEOUT,
    ENV_SCRAPE_TIMEOUT, ENV_SINK_CAPACITY, ENV_SKIP_TLS_VERIFY, ENV_USERNAME,
};
use emcecs_obs::ObsConfig;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::info;

fn secs(secs: u64) -> humantime::Duration {
    Duration::from_secs(secs).into()
}

/// Configuration for the ECS exporter
#[derive(Parser, Debug, Clone)]
#[command(
    name = "emcecs-exporter",
    about = "Prometheus exporter for ECS bucket metering and node health",
    version,
    long_about = r#"
ECS Exporter - Prometheus exporter for ECS storage clusters

Each scrape of /metrics queries the cluster management API for the billing
figures of every bucket in every namespace, and for the health of every node
in the local zone.

ENVIRONMENT VARIABLES:
  All command-line options can also be set via EMCECS_* environment variables.
  Command-line arguments take precedence over environment variables.

EXAMPLES:
  emcecs-exporter --cluster-address ecs.example.com --username monitor --password secret

  export EMCECS_CLUSTER_ADDRESS=ecs.example.com
  export EMCECS_USERNAME=monitor
  export EMCECS_PASSWORD=secret
  emcecs-exporter --skip-tls-verify --node-metrics reduced
"#
)]
pub struct Config {
    /// Management endpoint host name or IP
    #[arg(long, env = ENV_CLUSTER_ADDRESS)]
    pub cluster_address: Option<String>,

    /// Management user
    #[arg(long, env = ENV_USERNAME)]
    pub username: Option<String>,

    /// Management password
    #[arg(long, env = ENV_PASSWORD, hide_env_values = true)]
    pub password: Option<String>,

    /// Management API port
    #[arg(long, env = ENV_MGMT_PORT, default_value_t = DEFAULT_MGMT_PORT)]
    pub mgmt_port: u16,

    /// Talk plain http to the management API
    #[arg(long, env = ENV_INSECURE_HTTP)]
    pub insecure_http: bool,

    /// Accept self-signed management certificates
    #[arg(long, env = ENV_SKIP_TLS_VERIFY)]
    pub skip_tls_verify: bool,

    /// Timeout of a single management API request (e.g. "30s")
    #[arg(long, env = ENV_REQUEST_TIMEOUT, default_value_t = secs(DEFAULT_REQUEST_TIMEOUT_SECS))]
    pub request_timeout: humantime::Duration,

    /// Namespace billing queries in flight per scrape
    #[arg(long, env = ENV_BUCKET_CONCURRENCY, default_value_t = DEFAULT_BUCKET_CONCURRENCY)]
    pub bucket_concurrency: usize,

    /// Node detail requests in flight per scrape
    #[arg(long, env = ENV_NODE_CONCURRENCY, default_value_t = DEFAULT_NODE_CONCURRENCY)]
    pub node_concurrency: usize,

    /// Node metrics to export: "extended" or "reduced"
    #[arg(long, env = ENV_NODE_METRICS, default_value_t = NodeMetricSet::Extended)]
    pub node_metrics: NodeMetricSet,

    /// Prefix of every exported metric name
    #[arg(long, env = ENV_METRIC_NAMESPACE, default_value = DEFAULT_METRIC_NAMESPACE)]
    pub metric_namespace: String,

    /// Measurements buffered between collectors and the renderer
    #[arg(long, env = ENV_SINK_CAPACITY, default_value_t = DEFAULT_SINK_CAPACITY)]
    pub sink_capacity: usize,

    /// Listen address of the scrape endpoint
    #[arg(long, env = ENV_ADDRESS, default_value = DEFAULT_ADDRESS)]
    pub address: SocketAddr,

    /// Collection is cancelled once a scrape takes this long
    #[arg(long, env = ENV_SCRAPE_TIMEOUT, default_value_t = secs(DEFAULT_SCRAPE_TIMEOUT_SECS))]
    pub scrape_timeout: humantime::Duration,

    /// How long a rendered scrape is served from cache; "0s" disables caching
    #[arg(long, env = ENV_CACHE_TTL, default_value_t = secs(DEFAULT_CACHE_TTL_SECS))]
    pub cache_ttl: humantime::Duration,

    /// Log level; RUST_LOG takes precedence when set
    #[arg(long, env = ENV_LOG_LEVEL, default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,

    /// Write logs as JSON lines
    #[arg(long, env = ENV_LOG_JSON)]
    pub log_json: bool,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.cluster_address.as_deref().is_none_or(|a| a.trim().is_empty()) {
            anyhow::bail!("Cluster address is required. Set via --cluster-address or {ENV_CLUSTER_ADDRESS}");
        }

        if self.username.as_deref().is_none_or(str::is_empty) {
            anyhow::bail!("Username is required. Set via --username or {ENV_USERNAME}");
        }

        if self.password.as_deref().is_none_or(str::is_empty) {
            anyhow::bail!("Password is required. Set via --password or {ENV_PASSWORD}");
        }

        if self.bucket_concurrency == 0 || self.node_concurrency == 0 {
            anyhow::bail!("Bucket and node concurrency must be at least 1");
        }

        if !is_valid_metric_prefix(&self.metric_namespace) {
            anyhow::bail!(
                "Metric namespace '{}' must match [a-zA-Z_][a-zA-Z0-9_]*. Set via --metric-namespace or {ENV_METRIC_NAMESPACE}",
                self.metric_namespace
            );
        }

        if self.sink_capacity == 0 {
            anyhow::bail!("Sink capacity must be at least 1");
        }

        if self.scrape_timeout.is_zero() {
            anyhow::bail!("Scrape timeout must be greater than zero");
        }

        self.client_config().validate()?;
        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            cluster_address: self.cluster_address.clone().unwrap_or_default(),
            username: self.username.clone().unwrap_or_default(),
            password: self.password.clone().unwrap_or_default(),
            mgmt_port: self.mgmt_port,
            use_tls: !self.insecure_http,
            skip_tls_verify: self.skip_tls_verify,
            request_timeout: *self.request_timeout,
            node_concurrency: self.node_concurrency,
        }
    }

    pub fn obs_config(&self) -> ObsConfig {
        ObsConfig::new(self.log_level.clone(), self.log_json)
    }

    /// Log current configuration (without sensitive data)
    pub fn log_configuration(&self) {
        info!("Configuration:");
        info!("  Cluster: {}", self.client_config().base_url());
        info!("  Username: {}", self.username.as_deref().unwrap_or("Not set"));
        info!("  Password: [HIDDEN]");
        info!("  Skip TLS Verify: {}", self.skip_tls_verify);
        info!("  Request Timeout: {}", self.request_timeout);
        info!("  Bucket Concurrency: {}", self.bucket_concurrency);
        info!("  Node Concurrency: {}", self.node_concurrency);
        info!("  Node Metrics: {}", self.node_metrics);
        info!("  Metric Namespace: {}", self.metric_namespace);
        info!("  Sink Capacity: {}", self.sink_capacity);
        info!("  Listen Address: {}", self.address);
        info!("  Scrape Timeout: {}", self.scrape_timeout);
        info!("  Cache TTL: {}", self.cache_ttl);
        info!("  Log Level: {} (json: {})", self.log_level, self.log_json);
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cluster_address: None,
            username: None,
            password: None,
            mgmt_port: DEFAULT_MGMT_PORT,
            insecure_http: false,
            skip_tls_verify: false,
            request_timeout: secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            bucket_concurrency: DEFAULT_BUCKET_CONCURRENCY,
            node_concurrency: DEFAULT_NODE_CONCURRENCY,
            node_metrics: NodeMetricSet::Extended,
            metric_namespace: DEFAULT_METRIC_NAMESPACE.to_string(),
            sink_capacity: DEFAULT_SINK_CAPACITY,
            address: SocketAddr::from(([0, 0, 0, 0], 9438)),
            scrape_timeout: secs(DEFAULT_SCRAPE_TIMEOUT_SECS),
            cache_ttl: secs(DEFAULT_CACHE_TTL_SECS),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn valid() -> Config {
        Config {
            cluster_address: Some("ecs.example.com".to_string()),
            username: Some("monitor".to_string()),
            password: Some("secret".to_string()),
            ..Config::default()
        }
    }

    #[test]
    fn test_config_validation_success() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_config_validation_missing_fields() {
        let config = Config {
            cluster_address: None,
            ..valid()
        };
        assert!(config.validate().unwrap_err().to_string().contains("Cluster address"));

        let config = Config {
            password: Some(String::new()),
            ..valid()
        };
        assert!(config.validate().unwrap_err().to_string().contains("Password"));
    }

    #[test]
    fn test_config_validation_zero_limits() {
        let config = Config {
            bucket_concurrency: 0,
            ..valid()
        };
        assert!(config.validate().is_err());

        let config = Config {
            sink_capacity: 0,
            ..valid()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_metric_namespace() {
        let config = Config {
            metric_namespace: "my-ecs".to_string(),
            ..valid()
        };
        assert!(config.validate().unwrap_err().to_string().contains("Metric namespace"));

        let config = Config {
            metric_namespace: "ecs_prod".to_string(),
            ..valid()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_address_matches_constant() {
        assert_eq!(Config::default().address, DEFAULT_ADDRESS.parse::<SocketAddr>().unwrap());
    }

    #[test]
    #[serial]
    fn test_parse_defaults() {
        let config = Config::try_parse_from(["emcecs-exporter", "--cluster-address", "ecs.local"]).unwrap();
        assert_eq!(config.cluster_address.as_deref(), Some("ecs.local"));
        assert_eq!(config.mgmt_port, 4443);
        assert_eq!(*config.request_timeout, Duration::from_secs(30));
        assert_eq!(*config.scrape_timeout, Duration::from_secs(55));
        assert!(config.cache_ttl.is_zero());
        assert_eq!(config.node_metrics, NodeMetricSet::Extended);
        assert_eq!(config.metric_namespace, "emcecs");
        assert_eq!(config.address.port(), 9438);
    }

    #[test]
    #[serial]
    fn test_parse_overrides() {
        let config = Config::try_parse_from([
            "emcecs-exporter",
            "--cluster-address",
            "10.1.1.1",
            "--insecure-http",
            "--mgmt-port",
            "9020",
            "--request-timeout",
            "1m 30s",
            "--node-metrics",
            "reduced",
            "--cache-ttl",
            "15s",
            "--address",
            "127.0.0.1:9100",
        ])
        .unwrap();
        assert_eq!(*config.request_timeout, Duration::from_secs(90));
        assert_eq!(config.node_metrics, NodeMetricSet::Reduced);
        assert_eq!(*config.cache_ttl, Duration::from_secs(15));
        assert_eq!(config.client_config().base_url(), "http://10.1.1.1:9020");
    }

    #[test]
    #[serial]
    fn test_parse_rejects_unknown_node_metrics() {
        assert!(Config::try_parse_from(["emcecs-exporter", "--node-metrics", "everything"]).is_err());
    }

    #[test]
    #[serial]
    #[allow(unsafe_code)]
    fn test_env_fallback() {
        // SAFETY: serialized with the other parsing tests
        unsafe {
            std::env::set_var(ENV_BUCKET_CONCURRENCY, "9");
        }
        let config = Config::try_parse_from(["emcecs-exporter"]);
        unsafe {
            std::env::remove_var(ENV_BUCKET_CONCURRENCY);
        }
        assert_eq!(config.unwrap().bucket_concurrency, 9);
    }
}
