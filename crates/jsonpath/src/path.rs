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

use crate::extracted::Extracted;
use serde_json::Value;
use std::borrow::Cow;

const FAN_OUT: &str = "#";

/// Resolves `path` against `doc`.
///
/// An empty path resolves to the document itself. See the crate docs for the
/// path syntax.
pub fn get<'a>(doc: &'a Value, path: &str) -> Extracted<'a> {
    let segments = split_path(path);
    resolve(doc, &segments)
}

fn resolve<'a>(value: &'a Value, segments: &[String]) -> Extracted<'a> {
    let Some((head, rest)) = segments.split_first() else {
        return Extracted::Value(Cow::Borrowed(value));
    };

    if head == FAN_OUT {
        let Value::Array(items) = value else {
            return Extracted::Missing;
        };
        if rest.is_empty() {
            return Extracted::Value(Cow::Owned(Value::from(items.len())));
        }

        let mut matches = Vec::with_capacity(items.len());
        for item in items {
            match resolve(item, rest) {
                Extracted::Missing => {}
                Extracted::Value(v) => matches.push(v),
                // Nested fan-out keeps one array per outer element
                Extracted::Many(inner) => {
                    matches.push(Cow::Owned(Value::Array(inner.into_iter().map(Cow::into_owned).collect())));
                }
            }
        }
        return Extracted::Many(matches);
    }

    let next = match value {
        Value::Object(map) => map.get(head.as_str()),
        Value::Array(items) => head.parse::<usize>().ok().and_then(|index| items.get(index)),
        _ => None,
    };

    match next {
        Some(v) => resolve(v, rest),
        None => Extracted::Missing,
    }
}

/// Splits a dotted path into segments, honouring `\.` escapes.
fn split_path(path: &str) -> Vec<String> {
    if path.is_empty() {
        return Vec::new();
    }

    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => current.push(escaped),
                None => current.push('\\'),
            },
            '.' => segments.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    segments.push(current);

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("a.b.c"), vec!["a", "b", "c"]);
        assert_eq!(split_path("a\\.b.c"), vec!["a.b", "c"]);
        assert_eq!(split_path("items.#.name"), vec!["items", "#", "name"]);
        assert!(split_path("").is_empty());
    }

    #[test]
    fn test_object_and_index_lookup() {
        let doc = json!({"disk": {"space": [{"Space": 10}, {"Space": 20}]}});
        assert_eq!(get(&doc, "disk.space.1.Space").as_f64(), 20.0);
        assert!(!get(&doc, "disk.space.2.Space").exists());
        assert!(!get(&doc, "disk.space.x").exists());
    }

    #[test]
    fn test_fan_out_skips_elements_without_field() {
        let doc = json!({"bucket_billing_info": [{"name": "b1"}, {"total_size": 3}, {"name": "b2"}]});
        assert_eq!(get(&doc, "bucket_billing_info.#.name").strings(), vec!["b1", "b2"]);
    }

    #[test]
    fn test_fan_out_count() {
        let doc = json!({"node": [{}, {}, {}]});
        assert_eq!(get(&doc, "node.#").as_u64(), 3);
        assert_eq!(get(&doc, "missing.#").as_u64(), 0);
    }

    #[test]
    fn test_fan_out_on_non_array_is_missing() {
        let doc = json!({"namespace": {"name": "ns1"}});
        assert!(!get(&doc, "namespace.#.name").exists());
        assert!(get(&doc, "namespace.#.name").strings().is_empty());
    }

    #[test]
    fn test_nested_fan_out() {
        let doc = json!({"zones": [{"nodes": [{"id": "a"}, {"id": "b"}]}, {"nodes": [{"id": "c"}]}]});
        let nested = get(&doc, "zones.#.nodes.#.id");
        let outer = nested.array();
        assert_eq!(outer.len(), 2);
        assert_eq!(outer[0], &json!(["a", "b"]));
        assert_eq!(outer[1], &json!(["c"]));
    }

    #[test]
    fn test_escaped_key() {
        let doc = json!({"a.b": {"c": 7}});
        assert_eq!(get(&doc, "a\\.b.c").as_u64(), 7);
    }

    #[test]
    fn test_empty_path_is_document() {
        let doc = json!(42);
        assert_eq!(get(&doc, "").as_f64(), 42.0);
    }
}
