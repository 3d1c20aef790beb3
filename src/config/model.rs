//! Data model for the persisted configuration document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// The full persisted document: `{targets, routes, templates, message_format?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookConfig {
    #[serde(default)]
    pub targets: Vec<Target>,
    #[serde(default)]
    pub routes: HashMap<String, Route>,
    #[serde(default)]
    pub templates: HashMap<String, Value>,
    /// Documentation-only map of `event_type -> printf-style template`,
    /// preserved across load/save but not interpreted by the engine (see
    /// the per-target `format_type = "text"` path for the feature this
    /// anticipates).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_format: Option<Map<String, Value>>,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        let mut routes = HashMap::new();
        routes.insert("/webhook".to_string(), Route::default());

        let mut templates = HashMap::new();
        templates.insert(
            "trade".to_string(),
            serde_json::json!({
                "event_type": "trade",
                "description": "交易信号: {symbol} {operation} 价格: {price} 数量: {amount}",
                "data": {
                    "symbol": "{symbol}",
                    "operation": "{operation}",
                    "price": "{price}",
                    "amount": "{amount}"
                }
            }),
        );
        templates.insert(
            "error".to_string(),
            serde_json::json!({
                "event_type": "error",
                "description": "错误通知: {message}",
                "data": { "message": "{message}" }
            }),
        );

        let message_format = serde_json::json!({
            "trade": "交易信号: {symbol} {operation} 价格: {price} 数量: {amount}",
            "position_update": "持仓更新: {symbol} 数量: {amount} 价格: {current_price} 盈亏: {pnl}",
            "error": "错误通知: {message}",
            "status": "状态通知: {message}"
        });

        Self {
            targets: Vec::new(),
            routes,
            templates,
            message_format: message_format.as_object().cloned(),
        }
    }
}

/// An outbound forwarding destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wxid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbols: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_type: Option<String>,
}

fn default_true() -> bool {
    true
}

/// An inbound HTTP route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    #[serde(default)]
    pub target_ids: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_methods")]
    pub methods: Vec<String>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub query_params: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preprocess: Option<PreprocessSpec>,
}

impl Default for Route {
    fn default() -> Self {
        Self {
            target_ids: Vec::new(),
            description: "默认webhook路由".to_string(),
            methods: default_methods(),
            headers: HashMap::new(),
            query_params: HashMap::new(),
            template: None,
            preprocess: None,
        }
    }
}

fn default_methods() -> Vec<String> {
    vec!["POST".to_string()]
}

/// The declarative transform directives attached to a route.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PreprocessSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_mapping: Option<HashMap<String, String>>,
    #[serde(default = "default_true")]
    pub merge_mapped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_fields: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformations: Option<HashMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_fields: Option<HashMap<String, Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_seed_route_and_templates() {
        let cfg = WebhookConfig::default();
        assert!(cfg.routes.contains_key("/webhook"));
        assert!(cfg.templates.contains_key("trade"));
        assert!(cfg.templates.contains_key("error"));
        assert!(cfg.targets.is_empty());
    }

    #[test]
    fn target_enabled_defaults_true_when_absent() {
        let t: Target = serde_json::from_value(serde_json::json!({
            "id": "t1", "name": "n", "url": "http://x"
        }))
        .unwrap();
        assert!(t.enabled);
    }

    #[test]
    fn route_methods_default_to_post() {
        let r: Route = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(r.methods, vec!["POST".to_string()]);
    }

    #[test]
    fn preprocess_merge_mapped_defaults_true() {
        let p: PreprocessSpec = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(p.merge_mapped);
    }
}
