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

//! Tolerant path-based field extraction for cluster API responses.
//!
//! Management API responses are semi-structured: fields come and go between
//! releases, numbers are sometimes encoded as strings, and arrays of objects
//! are heterogeneous. This crate resolves a dotted path against a parsed
//! document and always hands back a value: a path that does not resolve reads
//! as `0`, `""` or an empty sequence instead of failing the whole response.
//!
//! # Path syntax
//!
//! - `a.b.c` walks object keys; `\.` escapes a literal dot inside a key.
//! - `items.0.name` indexes into an array.
//! - `items.#.name` fans out over every element of `items` and collects the
//!   `name` of each element that has one.
//! - `items.#` yields the length of `items`.
//!
//! # Example
//!
//! ```
//! let doc = emcecs_jsonpath::parse(r#"{"namespace":[{"name":"ns1"},{"name":"ns2"}]}"#).unwrap();
//! let names = emcecs_jsonpath::get(&doc, "namespace.#.name").strings();
//! assert_eq!(names, vec!["ns1", "ns2"]);
//! assert_eq!(emcecs_jsonpath::get(&doc, "namespace.#").as_u64(), 2);
//! assert_eq!(emcecs_jsonpath::get(&doc, "missing.field").as_f64(), 0.0);
//! ```

mod error;
mod extracted;
mod path;

pub use error::{JsonError, Result};
pub use extracted::{Extracted, coerce_f64, coerce_string};
pub use path::get;
pub use serde_json::Value;

/// Parses a response body into a document.
///
/// This is the only fallible operation of the crate; everything downstream of
/// a successfully parsed document is infallible.
pub fn parse(body: &str) -> Result<Value> {
    Ok(serde_json::from_str(body)?)
}
