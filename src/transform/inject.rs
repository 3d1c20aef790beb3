//! Stage 4: field injection.

use crate::value::set_path;
use serde_json::Value;
use std::collections::HashMap;

/// Set each `(path, literal)` from `add_fields`, creating parents as needed.
pub fn apply(mut result: Value, add_fields: &HashMap<String, Value>) -> Value {
    for (path, literal) in add_fields {
        set_path(&mut result, path, literal.clone());
    }
    result
}
