//! Dotted-path helpers over a generic [`serde_json::Value`] tree.
//!
//! The transform pipeline never knows the shape of an inbound payload ahead
//! of time, so every stage reads and writes through `.`-separated paths
//! (`"data.price"`) rather than typed struct fields. No array indexing is
//! supported — a path is a plain sequence of object keys.

use serde_json::{Map, Value};

/// Look up a dotted path (`"a.b.c"`) in `value`. Returns `None` if any
/// segment is missing or traverses through a non-object.
pub fn get_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for part in path.split('.') {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

/// Set `value` at a dotted path inside `target`, creating intermediate
/// objects as needed. If an intermediate segment already holds a
/// non-object value, it is silently overwritten with a fresh object (this
/// mirrors the source behavior: `dict.setdefault`-style traversal that
/// never backs off once it decides to descend).
pub fn set_path(target: &mut Value, path: &str, value: Value) {
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }

    let parts: Vec<&str> = path.split('.').collect();
    let mut current = target;
    for (i, part) in parts.iter().enumerate() {
        let map = current
            .as_object_mut()
            .expect("current is always coerced to an object before indexing");
        if i == parts.len() - 1 {
            map.insert((*part).to_string(), value);
            return;
        }
        let entry = map
            .entry((*part).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        current = entry;
    }
}

/// Flatten a JSON object into a map of dotted-path -> value, suitable for
/// `{name}`-style template substitution.
///
/// Every nested key is mapped to its leaf value *and*, for object values,
/// the whole sub-object is also kept under its full dotted name — templates
/// can therefore reference either `data.price` (the leaf) or `data` (the
/// object) depending on what they need.
pub fn flatten(value: &Value) -> Map<String, Value> {
    let mut out = Map::new();
    flatten_into(value, "", &mut out);
    out
}

fn flatten_into(value: &Value, prefix: &str, out: &mut Map<String, Value>) {
    let Some(obj) = value.as_object() else {
        return;
    };
    for (key, val) in obj {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        if val.is_object() {
            flatten_into(val, &full_key, out);
            out.insert(full_key, val.clone());
        } else {
            out.insert(full_key, val.clone());
        }
    }
}

/// Render `value` as the "canonical string form" used by `to_string` casts
/// and `{value}`/`$name` substitution: strings pass through unquoted,
/// everything else uses its JSON text.
pub fn value_to_plain_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Standard JSON truthiness: `false`, `null`, `0`, `0.0`, `""`, empty
/// arrays/objects are falsy; everything else is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_path_resolves_nested() {
        let v = json!({"a": {"b": {"c": 1}}});
        assert_eq!(get_path(&v, "a.b.c"), Some(&json!(1)));
    }

    #[test]
    fn get_path_missing_returns_none() {
        let v = json!({"a": 1});
        assert_eq!(get_path(&v, "a.b"), None);
        assert_eq!(get_path(&v, "x"), None);
    }

    #[test]
    fn set_path_creates_intermediates() {
        let mut v = json!({});
        set_path(&mut v, "a.b.c", json!(42));
        assert_eq!(v, json!({"a": {"b": {"c": 42}}}));
    }

    #[test]
    fn set_path_overwrites_non_object_intermediate() {
        let mut v = json!({"a": 1});
        set_path(&mut v, "a.b", json!(2));
        assert_eq!(v, json!({"a": {"b": 2}}));
    }

    #[test]
    fn flatten_keeps_leaf_and_whole_object() {
        let v = json!({"data": {"symbol": "BTC", "price": 50000}});
        let flat = flatten(&v);
        assert_eq!(flat.get("data.symbol"), Some(&json!("BTC")));
        assert_eq!(flat.get("data.price"), Some(&json!(50000)));
        assert_eq!(flat.get("data"), Some(&v["data"]));
    }

    #[test]
    fn truthiness_matches_python_semantics() {
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(null)));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!(1)));
    }
}
