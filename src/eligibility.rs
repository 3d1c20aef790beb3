//! Target eligibility for broadcast dispatch (`should_forward`).

use crate::config::Target;
use serde_json::Value;

/// Whether `target` should receive `message` in broadcast mode. Explicit
/// `target_ids` dispatch bypasses this entirely (see the dispatcher).
pub fn should_forward(message: &Value, target: &Target) -> bool {
    if !target.enabled {
        return false;
    }

    let event_type = message.get("event_type").and_then(Value::as_str);

    if let Some(event_types) = &target.event_types {
        match event_type {
            Some(e) if event_types.iter().any(|t| t == e) => {}
            _ => return false,
        }
    }

    if let (Some(symbols), Some(e)) = (&target.symbols, event_type) {
        if matches!(e, "trade" | "position_update") {
            if let Some(symbol) = message.pointer("/data/symbol").and_then(Value::as_str) {
                if !symbols.iter().any(|s| s == symbol) {
                    return false;
                }
            }
        }
    }

    true
}
