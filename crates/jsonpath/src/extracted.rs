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

use serde_json::Value;
use std::borrow::Cow;

/// Result of resolving a path against a document.
///
/// Every accessor has a defined zero value, so callers never have to branch
/// on whether a field was present.
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted<'a> {
    /// The path did not resolve
    Missing,
    /// The path resolved to a single value
    Value(Cow<'a, Value>),
    /// The path fanned out over an array (`#`) and matched these values
    Many(Vec<Cow<'a, Value>>),
}

impl<'a> Extracted<'a> {
    /// Whether the path resolved to anything, including JSON `null`.
    pub fn exists(&self) -> bool {
        !matches!(self, Extracted::Missing)
    }

    /// Numeric view of a single value; `0.0` for missing, fanned-out, or
    /// non-numeric results.
    pub fn as_f64(&self) -> f64 {
        match self {
            Extracted::Value(v) => coerce_f64(v),
            _ => 0.0,
        }
    }

    /// Non-negative integer view. Negative, fractional-below-one and
    /// non-finite values read as `0`; fractions are truncated.
    pub fn as_u64(&self) -> u64 {
        match self {
            Extracted::Value(v) => match &**v {
                Value::Number(n) if n.is_u64() => n.as_u64().unwrap_or_default(),
                other => {
                    let f = coerce_f64(other);
                    if f.is_finite() && f > 0.0 { f as u64 } else { 0 }
                }
            },
            _ => 0,
        }
    }

    /// String view. Scalars are rendered as text, objects and arrays as raw
    /// JSON, and a missing path as `""`.
    pub fn as_string(&self) -> String {
        match self {
            Extracted::Missing => String::new(),
            Extracted::Value(v) => coerce_string(v),
            Extracted::Many(values) => {
                Value::Array(values.iter().map(|v| (**v).clone()).collect()).to_string()
            }
        }
    }

    /// Sequence view. A fanned-out result yields its matches, an array yields
    /// its elements, any other present non-null value yields itself.
    pub fn array(&self) -> Vec<&Value> {
        match self {
            Extracted::Missing => Vec::new(),
            Extracted::Many(values) => values.iter().map(|v| &**v).collect(),
            Extracted::Value(v) => match &**v {
                Value::Array(items) => items.iter().collect(),
                Value::Null => Vec::new(),
                other => vec![other],
            },
        }
    }

    /// Every element of [`Extracted::array`] rendered as a string.
    pub fn strings(&self) -> Vec<String> {
        self.array().into_iter().map(coerce_string).collect()
    }

    /// Every element of [`Extracted::array`] coerced to a number.
    pub fn numbers(&self) -> Vec<f64> {
        self.array().into_iter().map(coerce_f64).collect()
    }
}

/// Coerces a JSON value to a number.
///
/// Native numbers are used as-is, numeric strings are parsed after trimming,
/// booleans map to `1`/`0`. Anything else is `0`.
pub fn coerce_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or_default(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()).unwrap_or_default(),
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

/// Renders a JSON value as text. Strings lose their quotes, `null` is empty.
pub fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::get;
    use serde_json::json;

    #[test]
    fn test_numeric_coercion() {
        let doc = json!({
            "native": 12,
            "float": 2.5,
            "text": " 1024 ",
            "garbage": "n/a",
            "flag": true,
            "nothing": null,
            "object": {"a": 1}
        });
        assert_eq!(get(&doc, "native").as_f64(), 12.0);
        assert_eq!(get(&doc, "float").as_f64(), 2.5);
        assert_eq!(get(&doc, "text").as_f64(), 1024.0);
        assert_eq!(get(&doc, "garbage").as_f64(), 0.0);
        assert_eq!(get(&doc, "flag").as_f64(), 1.0);
        assert_eq!(get(&doc, "nothing").as_f64(), 0.0);
        assert_eq!(get(&doc, "object").as_f64(), 0.0);
        assert_eq!(get(&doc, "absent").as_f64(), 0.0);
    }

    #[test]
    fn test_coerce_scalars() {
        assert_eq!(coerce_f64(&json!("3e2")), 300.0);
        assert_eq!(coerce_f64(&json!(false)), 0.0);
        assert_eq!(coerce_f64(&json!([1, 2])), 0.0);
        assert_eq!(coerce_string(&json!("node-1")), "node-1");
        assert_eq!(coerce_string(&json!(42)), "42");
        assert_eq!(coerce_string(&Value::Null), "");
    }

    #[test]
    fn test_as_u64() {
        let doc = json!({"big": 18446744073709551615u64, "neg": -4, "frac": "7.9", "nan": "NaN"});
        assert_eq!(get(&doc, "big").as_u64(), u64::MAX);
        assert_eq!(get(&doc, "neg").as_u64(), 0);
        assert_eq!(get(&doc, "frac").as_u64(), 7);
        assert_eq!(get(&doc, "nan").as_u64(), 0);
    }

    #[test]
    fn test_as_string() {
        let doc = json!({"name": "b1", "count": 3, "none": null, "list": [1, 2]});
        assert_eq!(get(&doc, "name").as_string(), "b1");
        assert_eq!(get(&doc, "count").as_string(), "3");
        assert_eq!(get(&doc, "none").as_string(), "");
        assert_eq!(get(&doc, "absent").as_string(), "");
        assert_eq!(get(&doc, "list").as_string(), "[1,2]");
    }

    #[test]
    fn test_fan_out_numbers() {
        let doc = json!({"items": [{"v": 1}, {"v": "2"}, {"v": "x"}]});
        let result = get(&doc, "items.#.v");
        assert_eq!(result.numbers(), vec![1.0, 2.0, 0.0]);
        assert_eq!(result.as_f64(), 0.0);
        assert_eq!(result.as_string(), r#"[1,"2","x"]"#);
    }

    #[test]
    fn test_array_of_scalar() {
        let doc = json!({"one": "ns1", "null": null});
        assert_eq!(get(&doc, "one").strings(), vec!["ns1"]);
        assert!(get(&doc, "null").array().is_empty());
    }
}
