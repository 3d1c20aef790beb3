//! The dynamic webhook endpoint: one fallback handler serving every
//! configured route, since axum binds its `Router` once at startup but
//! routes here are mutated at runtime through the control API.

use crate::admission::check_admission;
use crate::decode::decode_body;
use crate::dispatch::{dispatch_to_targets, DispatchOutcome};
use crate::eligibility::should_forward;
use crate::error::GatewayError;
use crate::state::AppState;
use crate::transform::transform;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header::CONTENT_TYPE, HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

/// Serves every request that doesn't match a statically registered control
/// route. Resolves the path against the live route table on every request.
pub async fn webhook_fallback(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response {
    match handle(state, method, uri, headers, query, body).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

async fn handle(
    state: AppState,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    query: HashMap<String, String>,
    body: Bytes,
) -> Result<Response, GatewayError> {
    let request_id = Uuid::new_v4();
    let path = uri.path();
    let snapshot = state.config.snapshot().await;

    let route = snapshot
        .routes
        .get(path)
        .ok_or_else(|| GatewayError::RouteNotFound(path.to_string()))?;

    if !route.methods.iter().any(|m| m.eq_ignore_ascii_case(method.as_str())) {
        return Err(GatewayError::Admission(format!(
            "method {method} not allowed on {path}"
        )));
    }

    check_admission(route, &headers, &query)?;

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream");
    let payload = decode_body(content_type, &body).await;

    let mut message = transform(payload, route.preprocess.as_ref(), route.template.as_deref(), &snapshot.templates);
    insert_route_metadata(&mut message, path, method.as_str());

    state.history.push(message.clone());

    let targets: Vec<_> = if route.target_ids.is_empty() {
        snapshot
            .targets
            .iter()
            .filter(|t| should_forward(&message, t))
            .cloned()
            .collect()
    } else {
        snapshot
            .targets
            .iter()
            .filter(|t| t.enabled && route.target_ids.iter().any(|id| id == &t.id))
            .cloned()
            .collect()
    };

    info!(%request_id, path, targets = targets.len(), "forwarding webhook message");

    let outcomes: Vec<DispatchOutcome> = dispatch_to_targets(&state.client, &message, &targets).await;

    Ok(Json(json!({
        "status": "success",
        "message": format!("消息已接收并通过路由 {path} 处理"),
        "results": outcomes,
    }))
    .into_response())
}

/// Sets `_route = {path, method, timestamp}` on the message, unless the
/// inbound payload already defined it — insert-if-missing, so a sender that
/// intentionally supplies its own `_route` field isn't overridden.
fn insert_route_metadata(message: &mut Value, path: &str, method: &str) {
    let Some(obj) = message.as_object_mut() else {
        return;
    };
    obj.entry("_route").or_insert_with(|| {
        json!({
            "path": path,
            "method": method,
            "timestamp": chrono::Utc::now().timestamp_millis(),
        })
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigStore, Route, Target, WebhookConfig};
    use axum::body::Body;
    use axum::http::Request;
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn state_with(config: WebhookConfig) -> AppState {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        tokio::fs::write(&path, serde_json::to_string(&config).unwrap()).await.unwrap();
        let store = ConfigStore::load(&path).await;
        // Leak the tempdir so it outlives the test's async calls.
        std::mem::forget(dir);
        AppState::new(Arc::new(store))
    }

    fn router(state: AppState) -> axum::Router {
        axum::Router::new().fallback(webhook_fallback).with_state(state)
    }

    #[tokio::test]
    async fn unknown_path_returns_404() {
        let state = state_with(WebhookConfig::default()).await;
        let response = router(state)
            .oneshot(Request::builder().uri("/nope").method("POST").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn disallowed_method_returns_400() {
        let state = state_with(WebhookConfig::default()).await;
        let response = router(state)
            .oneshot(Request::builder().uri("/webhook").method("GET").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    async fn broadcasts_to_enabled_targets_with_matching_event_type() {
        let mut config = WebhookConfig::default();
        config.targets.push(Target {
            id: "t1".into(),
            name: "n".into(),
            url: "http://127.0.0.1:1/dead".into(),
            enabled: true,
            r#type: None,
            wxid: None,
            event_types: Some(vec!["status".into()]),
            symbols: None,
            headers: None,
            timeout: Some(1),
            format: None,
            format_type: None,
        });
        config.routes.insert("/hook".into(), Route::default());

        let state = state_with(config).await;
        let body = json!({"event_type": "status", "description": "hi"}).to_string();
        let response = router(state)
            .oneshot(
                Request::builder()
                    .uri("/hook")
                    .method("POST")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }

    #[test]
    fn route_metadata_is_not_overridden_when_already_present() {
        let mut message = json!({"_route": {"path": "/custom", "method": "X", "timestamp": 1}});
        insert_route_metadata(&mut message, "/hook", "POST");
        assert_eq!(message["_route"]["path"], json!("/custom"));
    }

    #[test]
    fn route_metadata_is_inserted_when_absent() {
        let mut message = json!({"a": 1});
        insert_route_metadata(&mut message, "/hook", "POST");
        assert_eq!(message["_route"]["path"], json!("/hook"));
        assert_eq!(message["_route"]["method"], json!("POST"));
    }
}
