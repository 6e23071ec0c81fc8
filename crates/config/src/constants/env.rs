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

use const_str::concat;

pub const ENV_PREFIX: &str = "EMCECS_";

pub const ENV_CLUSTER_ADDRESS: &str = concat!(ENV_PREFIX, "CLUSTER_ADDRESS");
pub const ENV_USERNAME: &str = concat!(ENV_PREFIX, "USERNAME");
pub const ENV_PASSWORD: &str = concat!(ENV_PREFIX, "PASSWORD");
pub const ENV_MGMT_PORT: &str = concat!(ENV_PREFIX, "MGMT_PORT");
pub const ENV_INSECURE_HTTP: &str = concat!(ENV_PREFIX, "INSECURE_HTTP");
pub const ENV_SKIP_TLS_VERIFY: &str = concat!(ENV_PREFIX, "SKIP_TLS_VERIFY");
pub const ENV_REQUEST_TIMEOUT: &str = concat!(ENV_PREFIX, "REQUEST_TIMEOUT");

pub const ENV_BUCKET_CONCURRENCY: &str = concat!(ENV_PREFIX, "BUCKET_CONCURRENCY");
pub const ENV_NODE_CONCURRENCY: &str = concat!(ENV_PREFIX, "NODE_CONCURRENCY");
pub const ENV_NODE_METRICS: &str = concat!(ENV_PREFIX, "NODE_METRICS");
pub const ENV_METRIC_NAMESPACE: &str = concat!(ENV_PREFIX, "METRIC_NAMESPACE");
pub const ENV_SINK_CAPACITY: &str = concat!(ENV_PREFIX, "SINK_CAPACITY");

pub const ENV_ADDRESS: &str = concat!(ENV_PREFIX, "ADDRESS");
pub const ENV_SCRAPE_TIMEOUT: &str = concat!(ENV_PREFIX, "SCRAPE_TIMEOUT");
pub const ENV_CACHE_TTL: &str = concat!(ENV_PREFIX, "CACHE_TTL");

pub const ENV_LOG_LEVEL: &str = concat!(ENV_PREFIX, "LOG_LEVEL");
pub const ENV_LOG_JSON: &str = concat!(ENV_PREFIX, "LOG_JSON");
