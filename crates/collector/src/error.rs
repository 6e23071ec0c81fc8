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

pub type Result<T> = std::result::Result<T, CollectorError>;

/// Collection engine errors.
///
/// None of these escape a collection cycle: collectors log them and carry on.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// Label values do not match the metric's declared label schema
    #[error("Metric {metric} expects {expected} label values, got {got}")]
    LabelCardinality { metric: String, expected: usize, got: usize },

    /// Two registered collectors declare the same metric name
    #[error("Metric {0} is already registered")]
    DuplicateDescriptor(String),

    /// The consumer side of the metric sink has gone away
    #[error("Metric sink closed")]
    SinkClosed,
}
