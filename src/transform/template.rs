//! Stage 5: template application.
//!
//! Walks the named template tree; string leaves containing `{` are
//! substituted against a flattened view of the stage-4 payload using
//! Python-`str.format`-style `{name}` placeholders. A string with any
//! unresolved placeholder is left entirely unchanged (mirroring
//! `template.format(**data)` raising `KeyError` before producing any
//! output, with the whole original string returned by the `except`
//! clause — not a partial, per-placeholder substitution).

use serde_json::{Map, Value};

pub fn apply(template: &Value, payload: &Value) -> Value {
    let flat = crate::value::flatten(payload);
    substitute(template, &flat)
}

fn substitute(node: &Value, flat: &Map<String, Value>) -> Value {
    match node {
        Value::Object(map) => {
            let mut out = Map::new();
            for (k, v) in map {
                out.insert(k.clone(), substitute(v, flat));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(|i| substitute(i, flat)).collect()),
        Value::String(s) if s.contains('{') => Value::String(
            substitute_braces_checked(s, flat).unwrap_or_else(|| s.clone()),
        ),
        other => other.clone(),
    }
}

/// Replace every `{name}` placeholder found in `flat`, or return `None` if
/// any placeholder has no matching key — an unresolved placeholder aborts
/// the whole substitution rather than leaving it verbatim. Used directly by
/// [`substitute`] (stage 5) and by the target formatter's `text` mode, which
/// falls back to the message description rather than ship a template with
/// literal `{braces}` in it.
pub fn substitute_braces_checked(template: &str, flat: &Map<String, Value>) -> Option<String> {
    let mut out = String::with_capacity(template.len());
    let bytes = template.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'{' {
            if let Some(end) = template[i..].find('}') {
                let name = &template[i + 1..i + end];
                let value = flat.get(name)?;
                out.push_str(&crate::value::value_to_plain_string(value));
                i += end + 1;
                continue;
            }
        }
        let ch = template[i..].chars().next().unwrap();
        out.push(ch);
        i += ch.len_utf8();
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn substitutes_known_placeholders() {
        let template = json!({
            "description": "交易信号: {symbol} {operation} 价格: {price}"
        });
        let payload = json!({"symbol": "BTC/USDT", "operation": "买入", "price": 50000});
        let out = apply(&template, &payload);
        assert_eq!(
            out["description"],
            json!("交易信号: BTC/USDT 买入 价格: 50000")
        );
    }

    #[test]
    fn missing_placeholder_leaves_whole_string_unchanged() {
        let template = json!({"description": "{a} {missing}"});
        let payload = json!({"a": 1});
        let out = apply(&template, &payload);
        assert_eq!(out["description"], json!("{a} {missing}"));
    }

    #[test]
    fn recurses_through_nested_objects_and_arrays() {
        let template = json!({"data": {"symbol": "{symbol}"}, "tags": ["{symbol}"]});
        let payload = json!({"symbol": "ETH"});
        let out = apply(&template, &payload);
        assert_eq!(out, json!({"data": {"symbol": "ETH"}, "tags": ["ETH"]}));
    }
}
