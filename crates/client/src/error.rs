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

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Cluster management API errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure: connect, TLS, timeout, body read
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The management API answered with a non-success status
    #[error("Request to {url} failed with status {status}")]
    Status { status: u16, url: String },

    /// Credentials rejected, or the session token expired
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Login succeeded but no session token header came back
    #[error("Login response carried no {0} header")]
    MissingToken(&'static str),

    /// Response body could not be parsed
    #[error("Parse error: {0}")]
    ParseError(#[from] emcecs_jsonpath::JsonError),

    /// Client configuration is unusable
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ClientError {
    /// Check if error is authentication related
    pub fn is_auth_error(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_) | ClientError::MissingToken(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::HttpError(err.to_string())
    }
}
