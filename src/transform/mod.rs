//! The declarative transform pipeline: a pure function from
//! `(payload, preprocess spec, template name, templates catalogue)` to a
//! transformed payload, applied in five fixed stages regardless of the
//! spec's own key order.

mod cast;
mod include;
mod inject;
mod mapping;
pub mod template;

use crate::config::PreprocessSpec;
use serde_json::Value;
use std::collections::HashMap;
use tracing::error;

/// Run the preprocess stages (1-4), then the template stage (5) if
/// `template_name` resolves in `templates`. Never fails: a stage that
/// can't apply logs and returns the previous stage's output unchanged.
pub fn transform(
    payload: Value,
    preprocess: Option<&PreprocessSpec>,
    template_name: Option<&str>,
    templates: &HashMap<String, Value>,
) -> Value {
    let mut result = preprocess.map_or_else(|| payload.clone(), |spec| apply_preprocess(payload, spec));

    if let Some(name) = template_name {
        match templates.get(name) {
            Some(tpl) => result = template::apply(tpl, &result),
            None => {
                error!(template = name, "template not found, leaving payload unchanged");
            }
        }
    }

    result
}

fn apply_preprocess(payload: Value, spec: &PreprocessSpec) -> Value {
    let mut result = payload;

    if let Some(field_mapping) = &spec.field_mapping {
        result = mapping::apply(result, field_mapping, spec.merge_mapped);
    }

    if let Some(include_fields) = &spec.include_fields {
        result = include::apply(&result, include_fields);
    }

    if let Some(transformations) = &spec.transformations {
        result = cast::apply(result, transformations);
    }

    if let Some(add_fields) = &spec.add_fields {
        result = inject::apply(result, add_fields);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn templates_with_trade() -> HashMap<String, Value> {
        [(
            "trade".to_string(),
            json!({
                "description": "交易信号: {symbol} {operation} 价格: {price}"
            }),
        )]
        .into_iter()
        .collect()
    }

    #[test]
    fn preprocess_mapping_and_cast_then_inject() {
        let spec = PreprocessSpec {
            field_mapping: Some(
                [
                    ("event_type".to_string(), "type".to_string()),
                    ("data.price".to_string(), "p".to_string()),
                ]
                .into_iter()
                .collect(),
            ),
            merge_mapped: true,
            include_fields: None,
            transformations: Some([("data.price".to_string(), "to_float".to_string())].into_iter().collect()),
            add_fields: Some([("data.source".to_string(), json!("tv"))].into_iter().collect()),
        };

        let input = json!({"type": "trade", "p": "42.5"});
        let out = transform(input, Some(&spec), None, &HashMap::new());
        assert_eq!(
            out,
            json!({
                "type": "trade",
                "p": "42.5",
                "event_type": "trade",
                "data": {"price": 42.5, "source": "tv"}
            })
        );
    }

    #[test]
    fn template_applied_after_preprocess() {
        let input = json!({"symbol": "BTC/USDT", "operation": "买入", "price": 50000});
        let templates = templates_with_trade();
        let out = transform(input, None, Some("trade"), &templates);
        assert_eq!(out["description"], json!("交易信号: BTC/USDT 买入 价格: 50000"));
    }

    #[test]
    fn unknown_template_leaves_payload_unchanged() {
        let input = json!({"a": 1});
        let out = transform(input.clone(), None, Some("ghost"), &HashMap::new());
        assert_eq!(out, input);
    }

    #[test]
    fn is_deterministic_on_repeated_application() {
        let spec = PreprocessSpec {
            field_mapping: None,
            merge_mapped: true,
            include_fields: None,
            transformations: None,
            add_fields: Some([("tag".to_string(), json!("x"))].into_iter().collect()),
        };
        let input = json!({"a": 1});
        let once = transform(input.clone(), Some(&spec), None, &HashMap::new());
        let twice = transform(once.clone(), Some(&spec), None, &HashMap::new());
        // Re-applying add_fields is itself idempotent, so repeated
        // application on the already-transformed result is stable.
        assert_eq!(once, twice);
    }

    #[test]
    fn no_preprocess_no_template_is_identity() {
        let input = json!({"a": 1});
        let out = transform(input.clone(), None, None, &HashMap::new());
        assert_eq!(out, input);
    }
}
