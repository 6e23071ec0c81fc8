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

/// Default listen address of the scrape endpoint
/// Environment variable: EMCECS_ADDRESS
pub const DEFAULT_ADDRESS: &str = "0.0.0.0:9438";

/// Default scrape deadline, in seconds. Kept below the usual 60s scrape timeout.
/// Environment variable: EMCECS_SCRAPE_TIMEOUT
pub const DEFAULT_SCRAPE_TIMEOUT_SECS: u64 = 55;

/// Default rendered-output cache TTL, in seconds. `0` disables caching.
/// Environment variable: EMCECS_CACHE_TTL
pub const DEFAULT_CACHE_TTL_SECS: u64 = 0;

pub const METRICS_PATH: &str = "/metrics";
pub const HEALTH_PATH: &str = "/health";

/// Content type of the Prometheus text exposition format
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";
