//! Per-target output shaping: converts the transformed message into the
//! wire shape a specific target expects.

use crate::config::Target;
use serde_json::{json, Map, Value};
use tracing::warn;

/// Produce the outbound JSON body for `target` given the transformed
/// `message`. First matching rule in §4.6 wins.
pub fn format_for_target(message: &Value, target: &Target) -> Value {
    if let Some(format_type) = target.format_type.as_deref() {
        if format_type == "template" {
            if let Some(format) = &target.format {
                return substitute_dollar_tree(format, &scalar_union(message));
            }
        } else if format_type == "text" {
            if let Some(format) = &target.format {
                return render_text_format(message, format);
            }
        }
    }

    let url_lower = target.url.to_lowercase();
    let kind = target.r#type.as_deref();

    if kind == Some("wechat") || url_lower.contains("wechat") {
        return json!({
            "msgtype": "text",
            "text": { "content": description_or_stringified(message) }
        });
    }

    if kind == Some("wechat_personal") {
        let Some(wxid) = target.wxid.as_deref().filter(|w| !w.is_empty()) else {
            warn!(target = %target.name, "wechat_personal target missing wxid");
            return json!({});
        };
        return json!({
            "type": "sendText",
            "data": { "wxid": wxid, "msg": description_or_stringified(message) }
        });
    }

    if kind == Some("feishu") || url_lower.contains("feishu") {
        return json!({
            "msg_type": "text",
            "content": { "text": description_or_stringified(message) }
        });
    }

    if kind == Some("dingtalk") || url_lower.contains("dingtalk") {
        return json!({
            "msgtype": "text",
            "text": { "content": description_or_stringified(message) }
        });
    }

    message.clone()
}

/// Union of the message's top-level scalar fields and `message.data`'s
/// top-level scalar fields (nested data wins on collision, matching the
/// source's two sequential dict-update passes).
fn scalar_union(message: &Value) -> Map<String, Value> {
    let mut data = Map::new();
    if let Some(obj) = message.as_object() {
        for (k, v) in obj {
            if is_scalar(v) {
                data.insert(k.clone(), v.clone());
            }
        }
    }
    if let Some(nested) = message.get("data").and_then(Value::as_object) {
        for (k, v) in nested {
            if is_scalar(v) {
                data.insert(k.clone(), v.clone());
            }
        }
    }
    data
}

fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null)
}

fn render_text_format(message: &Value, format: &Value) -> Value {
    let event_type = message.get("event_type").and_then(Value::as_str).unwrap_or("unknown");
    let format_obj = format.as_object();
    let template = format_obj
        .and_then(|o| o.get(event_type))
        .or_else(|| format_obj.and_then(|o| o.get("default")))
        .and_then(Value::as_str);

    let Some(template) = template else {
        return json!({ "text": description_or_stringified(message) });
    };

    let data = scalar_union(message);
    match crate::transform::template::substitute_braces_checked(template, &data) {
        Some(rendered) => json!({ "text": rendered }),
        None => {
            warn!(event_type, "text format template references an unknown field");
            json!({ "text": description_or_stringified(message) })
        }
    }
}

fn substitute_dollar_tree(node: &Value, data: &Map<String, Value>) -> Value {
    match node {
        Value::Object(map) => {
            let mut out = Map::new();
            for (k, v) in map {
                out.insert(k.clone(), substitute_dollar_tree(v, data));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(|i| substitute_dollar_tree(i, data)).collect()),
        Value::String(s) if s.contains('$') => {
            let mut rendered = s.clone();
            for (key, value) in data {
                rendered = rendered.replace(&format!("${key}"), &crate::value::value_to_plain_string(value));
            }
            Value::String(rendered)
        }
        other => other.clone(),
    }
}

fn description_or_stringified(message: &Value) -> String {
    match message.get("description").and_then(Value::as_str) {
        Some(d) => d.to_string(),
        None => message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(kind: Option<&str>, url: &str) -> Target {
        Target {
            id: "t1".into(),
            name: "n".into(),
            url: url.into(),
            enabled: true,
            r#type: kind.map(String::from),
            wxid: None,
            event_types: None,
            symbols: None,
            headers: None,
            timeout: None,
            format: None,
            format_type: None,
        }
    }

    #[test]
    fn feishu_shapes_message() {
        let t = target(Some("feishu"), "http://fs/");
        let out = format_for_target(&json!({"description": "ping"}), &t);
        assert_eq!(out, json!({"msg_type": "text", "content": {"text": "ping"}}));
    }

    #[test]
    fn feishu_inferred_from_url_when_type_unset() {
        let t = target(None, "http://open.feishu.cn/hook");
        let out = format_for_target(&json!({"description": "ping"}), &t);
        assert_eq!(out["msg_type"], json!("text"));
    }

    #[test]
    fn wechat_personal_missing_wxid_warns_and_returns_empty() {
        let t = target(Some("wechat_personal"), "http://x/");
        let out = format_for_target(&json!({"description": "hi"}), &t);
        assert_eq!(out, json!({}));
    }

    #[test]
    fn dingtalk_shapes_message() {
        let t = target(Some("dingtalk"), "http://dt/");
        let out = format_for_target(&json!({"description": "hi"}), &t);
        assert_eq!(out, json!({"msgtype": "text", "text": {"content": "hi"}}));
    }

    #[test]
    fn default_passthrough_when_no_rule_matches() {
        let t = target(None, "http://custom/");
        let msg = json!({"event_type": "status", "description": "hi"});
        assert_eq!(format_for_target(&msg, &t), msg);
    }

    #[test]
    fn description_falls_back_to_stringified_message() {
        let t = target(Some("feishu"), "http://fs/");
        let msg = json!({"event_type": "status"});
        let out = format_for_target(&msg, &t);
        assert_eq!(out["content"]["text"], json!(msg.to_string()));
    }

    #[test]
    fn template_format_substitutes_dollar_tokens() {
        let mut t = target(None, "http://x/");
        t.format_type = Some("template".to_string());
        t.format = Some(json!({"text": "price=$price"}));
        let msg = json!({"data": {"price": 50000}});
        let out = format_for_target(&msg, &t);
        assert_eq!(out, json!({"text": "price=50000"}));
    }

    #[test]
    fn text_format_renders_event_specific_template() {
        let mut t = target(None, "http://x/");
        t.format_type = Some("text".to_string());
        t.format = Some(json!({"trade": "{symbol} at {price}", "default": "{description}"}));
        let msg = json!({"event_type": "trade", "symbol": "BTC", "price": 100});
        let out = format_for_target(&msg, &t);
        assert_eq!(out, json!({"text": "BTC at 100"}));
    }

    #[test]
    fn text_format_missing_key_falls_back_to_description() {
        let mut t = target(None, "http://x/");
        t.format_type = Some("text".to_string());
        t.format = Some(json!({"trade": "{missing_field}"}));
        let msg = json!({"event_type": "trade", "description": "fallback"});
        let out = format_for_target(&msg, &t);
        assert_eq!(out, json!({"text": "fallback"}));
    }
}
