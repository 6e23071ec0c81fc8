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

use crate::{ClientError, Result};
use emcecs_config::{DEFAULT_MGMT_PORT, DEFAULT_NODE_CONCURRENCY, DEFAULT_REQUEST_TIMEOUT_SECS};
use std::time::Duration;

/// Connection settings for one cluster's management API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Host name or IP of the management endpoint
    pub cluster_address: String,

    /// Management user
    pub username: String,

    /// Management password
    pub password: String,

    /// Management API port (default: 4443)
    pub mgmt_port: u16,

    /// Use https (default). Plain http is only meant for test rigs.
    pub use_tls: bool,

    /// Accept self-signed management certificates
    pub skip_tls_verify: bool,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Maximum node detail requests in flight during node retrieval
    pub node_concurrency: usize,
}

impl ClientConfig {
    /// Scheme, host and port every API path is appended to
    pub fn base_url(&self) -> String {
        let scheme = if self.use_tls { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.cluster_address, self.mgmt_port)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.cluster_address.trim().is_empty() {
            return Err(ClientError::ConfigError("cluster address is required".to_string()));
        }

        if self.username.is_empty() || self.password.is_empty() {
            return Err(ClientError::ConfigError("username and password are required".to_string()));
        }

        if self.node_concurrency == 0 {
            return Err(ClientError::ConfigError("node concurrency must be at least 1".to_string()));
        }

        if self.skip_tls_verify {
            tracing::warn!("TLS certificate verification disabled for {}", self.cluster_address);
        }

        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            cluster_address: String::new(),
            username: String::new(),
            password: String::new(),
            mgmt_port: DEFAULT_MGMT_PORT,
            use_tls: true,
            skip_tls_verify: false,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            node_concurrency: DEFAULT_NODE_CONCURRENCY,
        }
    }
}
