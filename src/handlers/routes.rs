//! CRUD over inbound webhook routes: `GET/POST /routes`, `PUT/DELETE /routes/{*path}`.
//!
//! Route keys are full request paths (e.g. `/webhook`, `/tv/alerts`). `POST`
//! takes the path from the request body (and creates a new route); `PUT`
//! takes it from the URL and merge-updates an existing one — mirroring the
//! original's two distinct `add_route`/`update_route` endpoints.

use crate::config::Route;
use crate::error::{GatewayError, GatewayResult};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Map, Value};

pub async fn list_routes(State(state): State<AppState>) -> Json<Value> {
    let snapshot = state.config.snapshot().await;
    Json(json!({ "routes": snapshot.routes }))
}

/// `POST /routes` — body must carry `path`; creates a new route entry.
pub async fn create_route(State(state): State<AppState>, Json(body): Json<Value>) -> GatewayResult<Json<Value>> {
    let path = body
        .get("path")
        .and_then(Value::as_str)
        .ok_or_else(|| GatewayError::InvalidRequest("路由必须包含path字段".to_string()))?;
    let key = full_path(path);

    let route = Route {
        target_ids: field_or_default(&body, "target_ids"),
        description: body
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("路由 {key}")),
        methods: field_or_default_with(&body, "methods", || vec!["POST".to_string()]),
        headers: field_or_default(&body, "headers"),
        query_params: field_or_default(&body, "query_params"),
        template: body.get("template").and_then(Value::as_str).map(str::to_string),
        preprocess: body
            .get("preprocess")
            .map(|v| serde_json::from_value(v.clone()))
            .transpose()
            .map_err(|e| GatewayError::InvalidRequest(e.to_string()))?,
    };

    state
        .config
        .mutate(|cfg| {
            cfg.routes.insert(key.clone(), route.clone());
        })
        .await;

    Ok(Json(json!({
        "status": "success",
        "message": format!("已添加路由: {key}"),
        "route": route_with_path(&key, &route),
    })))
}

/// `PUT /routes/{path}` — shallow merge update of an existing route.
pub async fn update_route(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Json(update): Json<Map<String, Value>>,
) -> GatewayResult<Json<Value>> {
    let key = full_path(&path);

    let merged = state
        .config
        .mutate(|cfg| match cfg.routes.get_mut(&key) {
            Some(slot) => {
                let mut existing = serde_json::to_value(&*slot).expect("Route always serializes");
                if let Some(existing_obj) = existing.as_object_mut() {
                    for (k, v) in &update {
                        existing_obj.insert(k.clone(), v.clone());
                    }
                }
                let merged: Route = serde_json::from_value(existing).map_err(|e| GatewayError::Internal(e.to_string()))?;
                *slot = merged.clone();
                Ok(merged)
            }
            None => Err(GatewayError::RouteNotFound(key.clone())),
        })
        .await?;

    Ok(Json(json!({
        "status": "success",
        "message": format!("已更新路由: {key}"),
        "route": route_with_path(&key, &merged),
    })))
}

pub async fn delete_route(State(state): State<AppState>, Path(path): Path<String>) -> GatewayResult<Json<Value>> {
    let key = full_path(&path);
    let removed = state.config.mutate(|cfg| cfg.routes.remove(&key).is_some()).await;

    if !removed {
        return Err(GatewayError::RouteNotFound(key));
    }

    Ok(Json(json!({
        "status": "success",
        "message": format!("已删除路由: {key}"),
    })))
}

fn full_path(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}

fn route_with_path(path: &str, route: &Route) -> Value {
    let mut value = serde_json::to_value(route).expect("Route always serializes");
    if let Some(obj) = value.as_object_mut() {
        obj.insert("path".to_string(), json!(path));
    }
    value
}

fn field_or_default<T: serde::de::DeserializeOwned + Default>(body: &Value, key: &str) -> T {
    body.get(key).and_then(|v| serde_json::from_value(v.clone()).ok()).unwrap_or_default()
}

fn field_or_default_with<T: serde::de::DeserializeOwned>(body: &Value, key: &str, default: impl FnOnce() -> T) -> T {
    body.get(key)
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or_else(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigStore, WebhookConfig};
    use std::sync::Arc;

    async fn state() -> AppState {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::load(dir.path().join("cfg.json")).await;
        std::mem::forget(dir);
        AppState::new(Arc::new(store))
    }

    #[tokio::test]
    async fn creates_a_route_from_body_path() {
        let state = state().await;
        create_route(State(state.clone()), Json(json!({"path": "tv/alerts"})))
            .await
            .unwrap();

        let listed = list_routes(State(state.clone())).await;
        assert!(listed.0["routes"].as_object().unwrap().contains_key("/tv/alerts"));
    }

    #[tokio::test]
    async fn create_without_path_is_rejected() {
        let state = state().await;
        let result = create_route(State(state), Json(json!({"description": "no path"}))).await;
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn update_merges_only_supplied_fields() {
        let state = state().await;
        create_route(State(state.clone()), Json(json!({"path": "/alerts", "description": "orig"})))
            .await
            .unwrap();

        let body: Map<String, Value> = json!({"target_ids": ["t1"]}).as_object().unwrap().clone();
        update_route(State(state.clone()), Path("alerts".to_string()), Json(body))
            .await
            .unwrap();

        let listed = list_routes(State(state)).await;
        let route = &listed.0["routes"]["/alerts"];
        assert_eq!(route["description"], json!("orig"));
        assert_eq!(route["target_ids"], json!(["t1"]));
    }

    #[tokio::test]
    async fn deregisters_a_route() {
        let state = state().await;
        create_route(State(state.clone()), Json(json!({"path": "tv/alerts"})))
            .await
            .unwrap();

        delete_route(State(state.clone()), Path("tv/alerts".to_string())).await.unwrap();
        let listed = list_routes(State(state.clone())).await;
        assert!(!listed.0["routes"].as_object().unwrap().contains_key("/tv/alerts"));
    }

    #[tokio::test]
    async fn deregistering_unknown_route_is_not_found() {
        let state = state().await;
        let result = delete_route(State(state), Path("ghost".to_string())).await;
        assert!(matches!(result, Err(GatewayError::RouteNotFound(_))));
    }

    #[tokio::test]
    async fn updating_unknown_route_is_not_found() {
        let state = state().await;
        let body: Map<String, Value> = json!({"description": "x"}).as_object().unwrap().clone();
        let result = update_route(State(state), Path("ghost".to_string()), Json(body)).await;
        assert!(matches!(result, Err(GatewayError::RouteNotFound(_))));
    }

    #[test]
    fn default_config_is_unaffected() {
        assert!(WebhookConfig::default().routes.contains_key("/webhook"));
    }
}
