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

use crate::error::{CollectorError, Result};
use crate::{MetricDesc, MetricType};
use std::sync::Arc;

/// A single sample of one metric, ready to be rendered.
///
/// Label values follow the order of the descriptor's label names; the arity
/// is checked once at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    desc: Arc<MetricDesc>,
    value: f64,
    label_values: Vec<String>,
}

impl Measurement {
    pub fn new(desc: &Arc<MetricDesc>, value: f64, label_values: Vec<String>) -> Result<Self> {
        let expected = desc.label_names().len();
        if label_values.len() != expected {
            return Err(CollectorError::LabelCardinality {
                metric: desc.fq_name().to_string(),
                expected,
                got: label_values.len(),
            });
        }

        Ok(Self {
            desc: desc.clone(),
            value,
            label_values,
        })
    }

    pub fn desc(&self) -> &MetricDesc {
        &self.desc
    }

    pub fn name(&self) -> &str {
        self.desc.fq_name()
    }

    pub fn metric_type(&self) -> MetricType {
        self.desc.metric_type()
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn label_values(&self) -> &[String] {
        &self.label_values
    }

    /// Label name and value pairs in schema order
    pub fn labels(&self) -> impl Iterator<Item = (&str, &str)> {
        self.desc
            .label_names()
            .iter()
            .copied()
            .zip(self.label_values.iter().map(String::as_str))
    }

    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels().find(|(k, _)| *k == name).map(|(_, v)| v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket_desc() -> Arc<MetricDesc> {
        Arc::new(MetricDesc::new(
            "emcecs_metering_bucket_object_count",
            "Number of objects",
            MetricType::Gauge,
            &["namespace", "bucket"],
        ))
    }

    #[test]
    fn test_new_measurement() {
        let m = Measurement::new(&bucket_desc(), 10.0, vec!["ns1".to_string(), "b1".to_string()]).unwrap();
        assert_eq!(m.name(), "emcecs_metering_bucket_object_count");
        assert_eq!(m.value(), 10.0);
        assert_eq!(m.metric_type(), MetricType::Gauge);
        assert_eq!(m.labels().collect::<Vec<_>>(), vec![("namespace", "ns1"), ("bucket", "b1")]);
        assert_eq!(m.label("bucket"), Some("b1"));
        assert_eq!(m.label("node"), None);
    }

    #[test]
    fn test_wrong_label_arity_is_rejected() {
        let err = Measurement::new(&bucket_desc(), 1.0, vec!["ns1".to_string()]).unwrap_err();
        match err {
            CollectorError::LabelCardinality { metric, expected, got } => {
                assert_eq!(metric, "emcecs_metering_bucket_object_count");
                assert_eq!(expected, 2);
                assert_eq!(got, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
