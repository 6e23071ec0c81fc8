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

//! Logging setup for the ECS exporter.
//!
//! ```no_run
//! use emcecs_obs::{ObsConfig, init_obs};
//!
//! let _guard = init_obs(&ObsConfig::new("info", true)).expect("logging");
//! tracing::info!("ready");
//! ```

mod config;
mod error;
mod telemetry;

pub use config::ObsConfig;
pub use error::ObsError;
pub use telemetry::ObsGuard;

/// Installs the process-wide tracing subscriber.
///
/// Keep the returned guard alive for the lifetime of the process. Fails if a
/// subscriber is already installed or the level is not a tracing level.
pub fn init_obs(config: &ObsConfig) -> Result<ObsGuard, ObsError> {
    telemetry::init_stdout_logging(config)
}
