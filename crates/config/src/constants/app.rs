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

/// Application name
/// Default value: emcecs-exporter
pub const APP_NAME: &str = "emcecs-exporter";

/// Application version, taken from the crate manifest
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default logger level
/// Default value: info
/// Environment variable: EMCECS_LOG_LEVEL
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default log output format
/// Default value: false (plain text)
/// Environment variable: EMCECS_LOG_JSON
pub const DEFAULT_LOG_JSON: bool = false;
