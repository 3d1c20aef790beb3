//! `POST /test` — synthesize a fixed sample trade message and forward it,
//! either to one target, through one route, or broadcast to every eligible
//! enabled target. Useful for verifying a target or route is wired up
//! correctly without waiting on a real upstream event.

use crate::dispatch::dispatch_to_targets;
use crate::eligibility::should_forward;
use crate::error::{GatewayError, GatewayResult};
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize, Default)]
pub struct TestQuery {
    target_id: Option<String>,
    route_path: Option<String>,
}

fn sample_message() -> Value {
    json!({
        "event_type": "test",
        "description": "这是一条测试消息",
        "timestamp": Utc::now().timestamp_millis(),
        "data": {
            "symbol": "BTC/USDT",
            "operation": "测试",
            "price": 50000,
            "amount": 0.1
        }
    })
}

pub async fn send_test_message(
    State(state): State<AppState>,
    Query(q): Query<TestQuery>,
) -> GatewayResult<Json<Value>> {
    let message = sample_message();
    let snapshot = state.config.snapshot().await;

    if let Some(target_id) = q.target_id {
        let target = snapshot
            .targets
            .iter()
            .find(|t| t.id == target_id)
            .ok_or_else(|| GatewayError::TargetNotFound(target_id.clone()))?;
        let outcomes = dispatch_to_targets(&state.client, &message, std::slice::from_ref(target)).await;
        let success = outcomes[0].success;
        return Ok(Json(json!({
            "status": if success { "success" } else { "error" },
            "message": format!("测试消息已发送到: {}", target.name),
            "result": outcomes[0],
        })));
    }

    if let Some(route_path) = q.route_path {
        let key = if route_path.starts_with('/') { route_path } else { format!("/{route_path}") };
        let route = snapshot
            .routes
            .get(&key)
            .ok_or_else(|| GatewayError::RouteNotFound(key.clone()))?;
        let targets: Vec<_> = snapshot
            .targets
            .iter()
            .filter(|t| t.enabled && route.target_ids.iter().any(|id| id == &t.id))
            .cloned()
            .collect();
        let outcomes = dispatch_to_targets(&state.client, &message, &targets).await;
        return Ok(Json(json!({
            "status": "success",
            "message": format!("测试消息已通过路由 {key} 发送"),
            "results": outcomes,
        })));
    }

    let targets: Vec<_> = snapshot.targets.iter().filter(|t| should_forward(&message, t)).cloned().collect();
    let outcomes = dispatch_to_targets(&state.client, &message, &targets).await;
    Ok(Json(json!({
        "status": "success",
        "message": "测试消息已发送到所有启用的目标",
        "results": outcomes,
    })))
}
