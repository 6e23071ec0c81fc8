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

//! Prometheus text exposition format (0.0.4) renderer.

use crate::{Measurement, MetricDesc};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Render measurements in Prometheus text exposition format.
///
/// Series are grouped under one `# HELP`/`# TYPE` header per metric, metrics
/// and series sorted by name and label values. When the same series appears
/// more than once the last value wins.
pub fn render_metrics(measurements: &[Measurement]) -> String {
    let mut families: BTreeMap<&str, (&MetricDesc, BTreeMap<&[String], f64>)> = BTreeMap::new();
    for m in measurements {
        let (_, series) = families.entry(m.name()).or_insert_with(|| (m.desc(), BTreeMap::new()));
        series.insert(m.label_values(), m.value());
    }

    let mut output = String::new();
    for (name, (desc, series)) in families {
        let _ = writeln!(output, "# HELP {} {}", name, escape_help(desc.help()));
        let _ = writeln!(output, "# TYPE {} {}", name, desc.metric_type().as_str());

        for (label_values, value) in series {
            if label_values.is_empty() {
                let _ = writeln!(output, "{} {}", name, format_value(value));
            } else {
                let labels: Vec<String> = desc
                    .label_names()
                    .iter()
                    .zip(label_values)
                    .map(|(k, v)| format!("{}=\"{}\"", k, escape_label_value(v)))
                    .collect();
                let _ = writeln!(output, "{}{{{}}} {}", name, labels.join(","), format_value(value));
            }
        }
    }

    output
}

/// Escape label values for the exposition format
fn escape_label_value(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// Escape help text
fn escape_help(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\n', "\\n")
}

/// Format float value for Prometheus
fn format_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        if v.is_sign_positive() { "+Inf" } else { "-Inf" }.to_string()
    } else if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{:.0}", v)
    } else {
        format!("{}", v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MetricType;
    use std::sync::Arc;

    fn desc(name: &str, metric_type: MetricType, labels: &'static [&'static str]) -> Arc<MetricDesc> {
        Arc::new(MetricDesc::new(name, "A test metric", metric_type, labels))
    }

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_render_simple_metric() {
        let m = Measurement::new(&desc("test_counter", MetricType::Counter, &[]), 42.0, Vec::new()).unwrap();
        let output = render_metrics(&[m]);
        assert_eq!(output, "# HELP test_counter A test metric\n# TYPE test_counter counter\ntest_counter 42\n");
    }

    #[test]
    fn test_render_groups_series_under_one_header() {
        let size = desc("bucket_size_bytes", MetricType::Gauge, &["namespace", "bucket"]);
        let count = desc("bucket_object_count", MetricType::Gauge, &["namespace", "bucket"]);
        let measurements = vec![
            Measurement::new(&size, 2e9, labels(&["ns1", "b1"])).unwrap(),
            Measurement::new(&count, 10.0, labels(&["ns1", "b1"])).unwrap(),
            Measurement::new(&size, 5.0, labels(&["ns1", "b2"])).unwrap(),
        ];
        let output = render_metrics(&measurements);

        assert_eq!(output.matches("# TYPE bucket_size_bytes gauge").count(), 1);
        assert!(output.contains("bucket_size_bytes{namespace=\"ns1\",bucket=\"b1\"} 2000000000\n"));
        assert!(output.contains("bucket_size_bytes{namespace=\"ns1\",bucket=\"b2\"} 5\n"));
        assert!(output.contains("bucket_object_count{namespace=\"ns1\",bucket=\"b1\"} 10\n"));

        let size_header = output.find("# HELP bucket_size_bytes").unwrap();
        let b2_line = output.find("bucket=\"b2\"").unwrap();
        assert!(b2_line > size_header);
    }

    #[test]
    fn test_last_value_wins_per_series() {
        let count = desc("bucket_object_count", MetricType::Gauge, &["namespace", "bucket"]);
        let measurements = vec![
            Measurement::new(&count, 1.0, labels(&["ns1", "dup"])).unwrap(),
            Measurement::new(&count, 7.0, labels(&["ns1", "dup"])).unwrap(),
        ];
        let output = render_metrics(&measurements);
        assert_eq!(output.matches("bucket=\"dup\"").count(), 1);
        assert!(output.contains("bucket_object_count{namespace=\"ns1\",bucket=\"dup\"} 7\n"));
    }

    #[test]
    fn test_escape_label_value() {
        assert_eq!(escape_label_value("hello\\world"), "hello\\\\world");
        assert_eq!(escape_label_value("say \"hi\""), "say \\\"hi\\\"");
        assert_eq!(escape_label_value("line1\nline2"), "line1\\nline2");

        let node = desc("node_disks_total", MetricType::Gauge, &["node"]);
        let m = Measurement::new(&node, 1.0, labels(&["a\"b"])).unwrap();
        assert!(render_metrics(&[m]).contains("node_disks_total{node=\"a\\\"b\"} 1\n"));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(f64::NAN), "NaN");
        assert_eq!(format_value(f64::INFINITY), "+Inf");
        assert_eq!(format_value(f64::NEG_INFINITY), "-Inf");
        assert_eq!(format_value(0.5), "0.5");
        assert_eq!(format_value(12.0), "12");
    }
}
