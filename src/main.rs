//! Webhook forwarder — entry point.
//!
//! Reads configuration from environment variables and starts the axum-based
//! HTTP server.
//!
//! # Environment variables
//!
//! | Variable              | Default               | Description |
//! |------------------------|------------------------|-------------|
//! | `GATEWAY_HOST`         | `0.0.0.0`                     | Host to bind to. |
//! | `GATEWAY_PORT`         | `8080`                        | TCP port to listen on. |
//! | `GATEWAY_CONFIG_PATH`  | `config/webhook_config.json`  | Path to the persisted config document. |
//! | `RUST_LOG`             | `webhook_forwarder=info` | Structured log filter. |

use tracing_subscriber::EnvFilter;
use webhook_forwarder::server::{GatewayServer, GatewayServerConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("webhook_forwarder=info")),
        )
        .init();

    let host = std::env::var("GATEWAY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

    let port: u16 = std::env::var("GATEWAY_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8080);

    let config_path =
        std::env::var("GATEWAY_CONFIG_PATH").unwrap_or_else(|_| "config/webhook_config.json".to_string());

    tracing::info!(host = %host, port, config_path = %config_path, "webhook forwarder configuration loaded");

    let server = GatewayServer::new(GatewayServerConfig { host, port, config_path });

    if let Err(e) = server.start().await {
        eprintln!("server error: {e}");
        std::process::exit(1);
    }
}
