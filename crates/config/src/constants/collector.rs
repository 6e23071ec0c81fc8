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

/// Maximum number of namespace billing queries in flight at once.
/// Four connections keep the management API responsive under load.
/// Default value: 4
/// Environment variable: EMCECS_BUCKET_CONCURRENCY
pub const DEFAULT_BUCKET_CONCURRENCY: usize = 4;

/// Maximum number of node detail queries in flight at once
/// Default value: 4
/// Environment variable: EMCECS_NODE_CONCURRENCY
pub const DEFAULT_NODE_CONCURRENCY: usize = 4;

/// Prefix of every exported metric name
/// Default value: emcecs
/// Environment variable: EMCECS_METRIC_NAMESPACE
pub const DEFAULT_METRIC_NAMESPACE: &str = "emcecs";

/// Capacity of the measurement channel between collectors and the renderer
/// Default value: 1024
/// Environment variable: EMCECS_SINK_CAPACITY
pub const DEFAULT_SINK_CAPACITY: usize = 1024;

/// Bytes per reported gigabyte in billing responses (decimal units)
pub const GB_TO_BYTES: f64 = 1_000_000_000.0;
