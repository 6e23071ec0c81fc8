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

//! Client for the ECS management REST API.
//!
//! The collection engine only needs three things from a cluster: a raw GET,
//! a raw POST, and the health of every node. [`ClusterApi`] is that seam;
//! [`EcsClient`] implements it over HTTPS with session-token authentication.
//!
//! # Example
//!
//! ```no_run
//! use emcecs_client::{ClientConfig, ClusterApi, EcsClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = EcsClient::new(ClientConfig {
//!     cluster_address: "ecs.example.com".to_string(),
//!     username: "monitor".to_string(),
//!     password: "secret".to_string(),
//!     ..Default::default()
//! })?;
//!
//! let namespaces = client.get("/object/namespaces").await?;
//! let nodes = client.retrieve_node_states().await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use emcecs_config::{DEFAULT_NODE_CONCURRENCY, NODE_DETAIL_PATH_PREFIX, NODE_LIST_PATH};
use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

pub mod client;
pub mod config;
pub mod error;
pub mod node;

pub use client::EcsClient;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use node::{DiskCounts, DiskSpace, NetworkStats, NodeState, ResourceUtilization, TransactionStats};

use node::NodeRef;

/// Calls the collectors make against a cluster.
///
/// Implementations do not retry; every failure is returned to the caller.
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// Cluster address, for log context
    fn cluster_address(&self) -> &str;

    /// GET `path` on the management API and return the raw body
    async fn get(&self, path: &str) -> Result<String>;

    /// POST a JSON `body` to `path` on the management API and return the raw body
    async fn post(&self, path: &str, body: &str) -> Result<String>;

    /// Maximum node detail requests in flight during [`ClusterApi::retrieve_node_states`]
    fn node_concurrency(&self) -> usize {
        DEFAULT_NODE_CONCURRENCY
    }

    /// Retrieves the state of every node in the local zone.
    ///
    /// The node list is fetched first; node details are then fetched with at
    /// most [`ClusterApi::node_concurrency`] requests in flight. The result
    /// keeps node-list order. A node whose detail request fails is logged and
    /// left out; only a failure to list nodes is an error.
    async fn retrieve_node_states(&self) -> Result<Vec<NodeState>> {
        let body = self.get(NODE_LIST_PATH).await?;
        let doc = emcecs_jsonpath::parse(&body)?;
        let nodes: Vec<NodeRef> = emcecs_jsonpath::get(&doc, "node")
            .array()
            .into_iter()
            .filter_map(NodeRef::from_value)
            .collect();

        if nodes.is_empty() {
            debug!("No nodes listed by {}", self.cluster_address());
            return Ok(Vec::new());
        }

        let limit = self.node_concurrency().max(1);
        let states = stream::iter(nodes)
            .map(|node| async move {
                let path = format!("{}/{}", NODE_DETAIL_PATH_PREFIX, node.id);
                let detail = self
                    .get(&path)
                    .await
                    .and_then(|body| emcecs_jsonpath::parse(&body).map_err(ClientError::from));
                match detail {
                    Ok(doc) => Some(NodeState::from_dashboard(node.address, &doc)),
                    Err(e) => {
                        warn!(node = %node.address, "Failed to retrieve node state: {}", e);
                        None
                    }
                }
            })
            .buffered(limit)
            .filter_map(std::future::ready)
            .collect::<Vec<_>>()
            .await;

        Ok(states)
    }
}
