//! Stage 2: inclusion filter.

use crate::value::{get_path, set_path};
use serde_json::{Map, Value};

/// Keep only the listed dotted paths, preserving nested structure. Missing
/// paths are silently omitted.
pub fn apply(input: &Value, include_fields: &[String]) -> Value {
    let mut filtered = Value::Object(Map::new());
    for path in include_fields {
        if let Some(value) = get_path(input, path) {
            set_path(&mut filtered, path, value.clone());
        }
    }
    filtered
}
