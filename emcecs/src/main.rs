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

use anyhow::{Context, Result};
use clap::Parser;
use emcecs::Config;
use emcecs_config::{APP_NAME, VERSION};
use emcecs_obs::init_obs;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    let _guard = init_obs(&config.obs_config()).context("Failed to initialize logging")?;

    info!("Starting {} v{}", APP_NAME, VERSION);

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        print_usage_help();
        return Err(e);
    }

    config.log_configuration();

    if let Err(e) = emcecs::run(config).await {
        error!("Exporter error: {:#}", e);
        return Err(e);
    }

    info!("{} shutdown complete", APP_NAME);
    Ok(())
}

fn print_usage_help() {
    eprintln!();
    eprintln!("{APP_NAME} - Prometheus exporter for ECS bucket metering and node health");
    eprintln!();
    eprintln!("For more help, run: {APP_NAME} --help");
    eprintln!();
    eprintln!("QUICK START:");
    eprintln!("  {APP_NAME} --cluster-address ecs.example.com --username monitor --password secret");
    eprintln!();
    eprintln!("  export EMCECS_CLUSTER_ADDRESS=ecs.example.com");
    eprintln!("  export EMCECS_USERNAME=monitor");
    eprintln!("  export EMCECS_PASSWORD=secret");
    eprintln!("  {APP_NAME}");
    eprintln!();
}
