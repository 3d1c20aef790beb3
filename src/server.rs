//! Axum-based HTTP server.
//!
//! [`GatewayServer`] wires the control API and the dynamic webhook fallback
//! into a running axum service.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`              | `/health`          | Liveness check — always `200 OK`. |
//! | `GET`, `POST`       | `/targets`         | List / create forwarding targets. |
//! | `PUT`, `DELETE`     | `/targets/{id}`    | Update / remove a target. |
//! | `GET`, `POST`       | `/routes`          | List inbound routes / register a new one. |
//! | `PUT`, `DELETE`     | `/routes/{*path}`  | Merge-update / deregister a route. |
//! | `GET`               | `/history`         | Recently received messages. |
//! | `POST`              | `/test`            | Send a synthetic message for testing. |
//! | (any unmatched path) | —                 | Dynamic webhook dispatch. |

use crate::config::ConfigStore;
use crate::handlers::{
    create_route, create_target, delete_route, delete_target, get_history, list_routes, list_targets,
    send_test_message, update_route, update_target, webhook_fallback,
};
use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// Runtime configuration for [`GatewayServer`].
pub struct GatewayServerConfig {
    /// Host to bind to (default: `0.0.0.0`).
    pub host: String,
    /// TCP port to listen on (default: `8080`).
    pub port: u16,
    /// Path to the persisted webhook configuration document.
    pub config_path: String,
}

impl Default for GatewayServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            config_path: "config/webhook_config.json".to_string(),
        }
    }
}

/// High-level server encapsulating the config store and axum router.
pub struct GatewayServer {
    config: GatewayServerConfig,
}

impl GatewayServer {
    pub fn new(config: GatewayServerConfig) -> Self {
        Self { config }
    }

    /// Build the axum [`Router`], loading (or seeding) the persisted config
    /// document. Call [`start()`](Self::start) to bind and serve.
    pub async fn build_app(&self) -> Router {
        let store = ConfigStore::load(self.config.config_path.clone()).await;
        let state = AppState::new(Arc::new(store));

        Router::new()
            .route("/health", get(health_handler))
            .route("/targets", get(list_targets).post(create_target))
            .route("/targets/{id}", put(update_target).delete(delete_target))
            .route("/routes", get(list_routes).post(create_route))
            .route("/routes/{*path}", put(update_route).delete(delete_route))
            .route("/history", get(get_history))
            .route("/test", post(send_test_message))
            .fallback(webhook_fallback)
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(state)
    }

    /// Bind the server to `{host}:{port}` and serve until the process exits.
    pub async fn start(self) -> std::io::Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let app = self.build_app().await;
        info!(addr = %addr, "webhook forwarder starting");
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app).await
    }
}

/// `GET /health` — liveness probe.
async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "service": "webhook-forwarder" }))
}
