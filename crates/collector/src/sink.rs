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

//! Bounded channel carrying measurements from collectors to the registry.

use crate::Measurement;
use crate::error::{CollectorError, Result};
use tokio::sync::mpsc;
use tracing::debug;

/// Creates a sink and the stream that drains it.
///
/// Writers wait while `capacity` measurements are queued.
pub fn channel(capacity: usize) -> (MetricSink, MetricStream) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (MetricSink { tx }, MetricStream { rx })
}

/// Cloneable writer half of a measurement channel.
#[derive(Debug, Clone)]
pub struct MetricSink {
    tx: mpsc::Sender<Measurement>,
}

impl MetricSink {
    /// Sends one measurement, waiting for room when the channel is full.
    pub async fn send(&self, measurement: Measurement) -> Result<()> {
        self.tx.send(measurement).await.map_err(|_| CollectorError::SinkClosed)
    }

    /// Sends a batch in order, stopping at the first failure.
    ///
    /// A closed sink is not an error for collectors: the batch is dropped and
    /// `false` is returned so the caller can stop producing.
    pub async fn emit(&self, measurements: impl IntoIterator<Item = Measurement>) -> bool {
        for measurement in measurements {
            if let Err(e) = self.send(measurement).await {
                debug!("Dropping measurements: {}", e);
                return false;
            }
        }
        true
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Reader half of a measurement channel.
#[derive(Debug)]
pub struct MetricStream {
    rx: mpsc::Receiver<Measurement>,
}

impl MetricStream {
    pub async fn recv(&mut self) -> Option<Measurement> {
        self.rx.recv().await
    }

    /// Drains the stream until every sink clone has been dropped.
    pub async fn collect(mut self) -> Vec<Measurement> {
        let mut measurements = Vec::new();
        while let Some(measurement) = self.rx.recv().await {
            measurements.push(measurement);
        }
        measurements
    }
}
