//! Stage 1: field mapping.

use crate::value::{get_path, set_path};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Build `mapped` from `field_mapping`, then merge it into (or replace)
/// `input` depending on `merge_mapped`.
pub fn apply(input: Value, field_mapping: &HashMap<String, String>, merge_mapped: bool) -> Value {
    let mut mapped = Value::Object(Map::new());
    for (target_path, source_path) in field_mapping {
        if let Some(value) = get_path(&input, source_path) {
            set_path(&mut mapped, target_path, value.clone());
        }
    }

    if merge_mapped {
        let mut result = input;
        if let (Some(result_obj), Some(mapped_obj)) = (result.as_object_mut(), mapped.as_object()) {
            for (k, v) in mapped_obj {
                result_obj.insert(k.clone(), v.clone());
            }
        } else {
            result = mapped;
        }
        result
    } else {
        mapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_and_merges_by_default() {
        let input = json!({"type": "trade", "p": "42.5"});
        let mapping: HashMap<String, String> = [
            ("event_type".to_string(), "type".to_string()),
            ("data.price".to_string(), "p".to_string()),
        ]
        .into_iter()
        .collect();

        let out = apply(input, &mapping, true);
        assert_eq!(
            out,
            json!({"type": "trade", "p": "42.5", "event_type": "trade", "data": {"price": "42.5"}})
        );
    }

    #[test]
    fn mapped_only_when_merge_disabled() {
        let input = json!({"type": "trade", "extra": "dropped"});
        let mapping: HashMap<String, String> =
            [("event_type".to_string(), "type".to_string())].into_iter().collect();

        let out = apply(input, &mapping, false);
        assert_eq!(out, json!({"event_type": "trade"}));
    }

    #[test]
    fn missing_source_path_is_skipped() {
        let input = json!({"a": 1});
        let mapping: HashMap<String, String> =
            [("b".to_string(), "nonexistent".to_string())].into_iter().collect();

        let out = apply(input, &mapping, true);
        assert_eq!(out, json!({"a": 1}));
    }
}
