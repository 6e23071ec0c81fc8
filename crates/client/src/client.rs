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

use crate::{ClientConfig, ClientError, ClusterApi, Result};
use async_trait::async_trait;
use emcecs_config::{AUTH_TOKEN_HEADER, LOGIN_PATH, LOGOUT_PATH};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

/// HTTP client for one cluster's management API.
///
/// Cloning is cheap; clones share the connection pool and the session token.
#[derive(Clone)]
pub struct EcsClient {
    client: Client,
    cluster_address: String,
    base_url: String,
    username: String,
    password: String,
    node_concurrency: usize,
    token: Arc<RwLock<Option<String>>>,
}

impl fmt::Debug for EcsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EcsClient")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"[HIDDEN]")
            .field("node_concurrency", &self.node_concurrency)
            .finish()
    }
}

impl EcsClient {
    /// Create new cluster client
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .danger_accept_invalid_certs(config.skip_tls_verify)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::ConfigError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url(),
            cluster_address: config.cluster_address,
            username: config.username,
            password: config.password,
            node_concurrency: config.node_concurrency,
            token: Arc::new(RwLock::new(None)),
        })
    }

    /// Scheme, host and port of the management API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether a session token is currently cached
    pub async fn has_session(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// Opens a new session, replacing any cached token
    pub async fn login(&self) -> Result<String> {
        let mut guard = self.token.write().await;
        let token = self.authenticate().await?;
        *guard = Some(token.clone());
        Ok(token)
    }

    /// Closes the cached session, if any
    pub async fn logout(&self) -> Result<()> {
        let Some(token) = self.token.write().await.take() else {
            return Ok(());
        };

        let url = self.url(LOGOUT_PATH);
        let response = self.client.get(&url).header(AUTH_TOKEN_HEADER, token).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Logout from {} returned status {}", self.cluster_address, status);
            return Err(ClientError::Status {
                status: status.as_u16(),
                url,
            });
        }

        debug!("Logged out of cluster {}", self.cluster_address);
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn authenticate(&self) -> Result<String> {
        let url = self.url(LOGIN_PATH);
        debug!("Logging in to {} as {}", url, self.username);

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send login request: {}", e);
                ClientError::from(e)
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ClientError::Unauthorized(format!("login rejected for user {}", self.username)));
        }
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let token = response
            .headers()
            .get(AUTH_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .ok_or(ClientError::MissingToken(AUTH_TOKEN_HEADER))?;

        info!("Logged in to cluster {}", self.cluster_address);
        Ok(token)
    }

    /// Returns the cached token, logging in first when there is none.
    async fn session_token(&self) -> Result<String> {
        {
            let guard = self.token.read().await;
            if let Some(token) = guard.as_ref() {
                return Ok(token.clone());
            }
        }

        // Concurrent callers queue here; only the first one logs in
        let mut guard = self.token.write().await;
        if let Some(token) = guard.as_ref() {
            return Ok(token.clone());
        }
        let token = self.authenticate().await?;
        *guard = Some(token.clone());
        Ok(token)
    }

    async fn invalidate(&self, token: &str) {
        let mut guard = self.token.write().await;
        if guard.as_deref() == Some(token) {
            *guard = None;
        }
    }

    async fn call(&self, method: Method, path: &str, body: Option<&str>) -> Result<String> {
        let token = self.session_token().await?;
        let url = self.url(path);

        let mut request = self
            .client
            .request(method, &url)
            .header(AUTH_TOKEN_HEADER, &token)
            .header(ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").body(body.to_string());
        }

        let response = request.send().await?;
        let status = response.status();
        debug!("{} returned {}", url, status);

        if status == StatusCode::UNAUTHORIZED {
            // Next call logs in again
            self.invalidate(&token).await;
            return Err(ClientError::Unauthorized(format!("session rejected by {url}")));
        }
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                url,
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl ClusterApi for EcsClient {
    fn cluster_address(&self) -> &str {
        &self.cluster_address
    }

    async fn get(&self, path: &str) -> Result<String> {
        self.call(Method::GET, path, None).await
    }

    async fn post(&self, path: &str, body: &str) -> Result<String> {
        self.call(Method::POST, path, Some(body)).await
    }

    fn node_concurrency(&self) -> usize {
        self.node_concurrency
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ClientConfig {
        ClientConfig {
            cluster_address: "ecs.example.com".to_string(),
            username: "monitor".to_string(),
            password: "hunter2".to_string(),
            node_concurrency: 3,
            ..Default::default()
        }
    }

    #[test]
    fn test_client_creation() {
        let client = EcsClient::new(config()).unwrap();
        assert_eq!(client.base_url(), "https://ecs.example.com:4443");
        assert_eq!(client.cluster_address(), "ecs.example.com");
        assert_eq!(client.node_concurrency(), 3);
        assert_eq!(client.url("/object/namespaces"), "https://ecs.example.com:4443/object/namespaces");
    }

    #[test]
    fn test_client_rejects_invalid_config() {
        let result = EcsClient::new(ClientConfig::default());
        assert!(matches!(result, Err(ClientError::ConfigError(_))));
    }

    #[test]
    fn test_debug_hides_password() {
        let client = EcsClient::new(config()).unwrap();
        let dbg = format!("{client:?}");
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("[HIDDEN]"));
    }

    #[tokio::test]
    async fn test_logout_without_session_is_noop() {
        let client = EcsClient::new(config()).unwrap();
        assert!(!client.has_session().await);
        assert!(client.logout().await.is_ok());
    }
}
