//! Stage 3: type transforms.

use crate::value::{get_path, set_path, value_to_plain_string};
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

/// Apply each `(path, kind)` cast in turn. Paths that don't resolve are
/// skipped; casts that fail fall back to a documented default rather than
/// aborting the pipeline.
pub fn apply(mut result: Value, transformations: &HashMap<String, String>) -> Value {
    for (path, kind) in transformations {
        let Some(value) = get_path(&result, path).cloned() else {
            continue;
        };
        let transformed = cast_one(&value, kind);
        set_path(&mut result, path, transformed);
    }
    result
}

fn cast_one(value: &Value, kind: &str) -> Value {
    match kind {
        "to_string" => Value::String(value_to_plain_string(value)),
        "to_int" => Value::Number(parse_int(value).into()),
        "to_float" => serde_json::Number::from_f64(parse_float(value))
            .map(Value::Number)
            .unwrap_or(Value::Number(0.into())),
        "to_bool" => Value::Bool(to_bool(value)),
        _ => {
            if let Some(template) = kind.strip_prefix("format:") {
                match format_value(template, value) {
                    Some(s) => Value::String(s),
                    None => value.clone(),
                }
            } else {
                value.clone()
            }
        }
    }
}

fn parse_int(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n.as_i64().unwrap_or_else(|| n.as_f64().unwrap_or(0.0) as i64),
        Value::String(s) => s.trim().parse::<i64>().unwrap_or_else(|_| {
            s.trim().parse::<f64>().map(|f| f as i64).unwrap_or(0)
        }),
        Value::Bool(b) => *b as i64,
        _ => 0,
    }
}

fn parse_float(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
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

fn to_bool(value: &Value) -> bool {
    match value {
        Value::String(s) => matches!(s.to_lowercase().as_str(), "true" | "yes" | "1" | "y"),
        other => crate::value::is_truthy(other),
    }
}

/// `"{value}"`-style substitution used by `format:<tmpl>` casts.
fn format_value(template: &str, value: &Value) -> Option<String> {
    if !template.contains("{value}") {
        warn!(template, "format cast template has no {{value}} placeholder");
        return None;
    }
    Some(template.replace("{value}", &value_to_plain_string(value)))
}
