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

//! Stdout logging backend.

mod filter;

use crate::{ObsConfig, ObsError};
use emcecs_config::{APP_NAME, VERSION};
use filter::build_env_filter;
use std::io::IsTerminal;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Keeps the non-blocking writer alive. Dropping it flushes buffered records.
#[must_use = "logs are lost when the guard is dropped"]
#[derive(Debug)]
pub struct ObsGuard {
    _worker: WorkerGuard,
}

/// Installs the global subscriber: an `EnvFilter` and one formatting layer
/// writing to stdout through a non-blocking worker.
pub(crate) fn init_stdout_logging(config: &ObsConfig) -> Result<ObsGuard, ObsError> {
    let level = config.normalized_level()?;
    let env_filter = build_env_filter(&level);
    let (writer, worker) = tracing_appender::non_blocking(std::io::stdout());

    let json_layer = config.json.then(|| {
        tracing_subscriber::fmt::layer()
            .with_timer(LocalTime::rfc_3339())
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(writer.clone())
            .json()
            .with_current_span(true)
            .with_span_list(false)
    });
    let text_layer = (!config.json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_timer(LocalTime::rfc_3339())
            .with_target(true)
            .with_ansi(std::io::stdout().is_terminal())
            .with_writer(writer.clone())
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .map_err(|e| ObsError::Init(e.to_string()))?;

    info!("Init stdout logging for {} {} (level: {}, json: {})", APP_NAME, VERSION, level, config.json);
    Ok(ObsGuard { _worker: worker })
}
