//! CRUD over forwarding targets: `GET/POST /targets`, `PUT/DELETE /targets/{id}`.

use crate::config::Target;
use crate::error::{GatewayError, GatewayResult};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Map, Value};

pub async fn list_targets(State(state): State<AppState>) -> Json<Value> {
    let snapshot = state.config.snapshot().await;
    Json(json!({ "targets": snapshot.targets }))
}

/// `POST /targets` — body must carry `name`/`url`; `id` is generated when
/// absent and `enabled` defaults to `true`, matching the original's
/// `target_id = f"target_{int(time.time())}"` id-generation fallback.
pub async fn create_target(
    State(state): State<AppState>,
    Json(mut body): Json<Value>,
) -> GatewayResult<Json<Value>> {
    let obj = body
        .as_object_mut()
        .ok_or_else(|| GatewayError::InvalidRequest("target body must be a JSON object".to_string()))?;

    if !obj.contains_key("name") || !obj.contains_key("url") {
        return Err(GatewayError::InvalidRequest(
            "target must include name and url".to_string(),
        ));
    }
    obj.entry("id")
        .or_insert_with(|| json!(format!("target_{}", chrono::Utc::now().timestamp())));
    obj.entry("enabled").or_insert_with(|| json!(true));

    let target: Target = serde_json::from_value(body).map_err(|e| GatewayError::InvalidRequest(e.to_string()))?;

    state
        .config
        .mutate(|cfg| {
            if cfg.targets.iter().any(|t| t.id == target.id) {
                return Err(GatewayError::InvalidRequest(format!(
                    "target with id {} already exists",
                    target.id
                )));
            }
            cfg.targets.push(target.clone());
            Ok(())
        })
        .await?;

    Ok(Json(json!({
        "status": "success",
        "message": format!("已添加转发目标: {}", target.name),
        "target": target,
    })))
}

/// `PUT /targets/{id}` — shallow merge update: only the fields present in
/// the request body are overwritten, matching the original's
/// `self.config["targets"][i].update(target_update)`.
pub async fn update_target(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<Map<String, Value>>,
) -> GatewayResult<Json<Value>> {
    let merged = state
        .config
        .mutate(|cfg| match cfg.targets.iter_mut().find(|t| t.id == id) {
            Some(slot) => {
                let mut existing = serde_json::to_value(&*slot).expect("Target always serializes");
                if let Some(existing_obj) = existing.as_object_mut() {
                    for (k, v) in &update {
                        existing_obj.insert(k.clone(), v.clone());
                    }
                }
                let merged: Target = serde_json::from_value(existing).map_err(|e| GatewayError::Internal(e.to_string()))?;
                *slot = merged.clone();
                Ok(merged)
            }
            None => Err(GatewayError::TargetNotFound(id.clone())),
        })
        .await?;

    Ok(Json(json!({
        "status": "success",
        "message": format!("已更新转发目标: {}", merged.name),
        "target": merged,
    })))
}

pub async fn delete_target(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> GatewayResult<Json<Value>> {
    state
        .config
        .mutate(|cfg| {
            let before = cfg.targets.len();
            cfg.targets.retain(|t| t.id != id);
            if cfg.targets.len() == before {
                return Err(GatewayError::TargetNotFound(id.clone()));
            }
            Ok(())
        })
        .await?;

    Ok(Json(json!({
        "status": "success",
        "message": format!("已删除转发目标 ID: {id}"),
    })))
}
