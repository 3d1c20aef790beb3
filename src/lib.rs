//! Webhook Forwarder — a programmable webhook forwarding gateway.
//!
//! Receives inbound webhooks on dynamically configurable routes, runs each
//! message through a declarative transform pipeline (field mapping,
//! inclusion filtering, type casts, field injection, template rendering),
//! and fans it out concurrently to any number of outbound targets, each
//! shaped for the messaging service it represents.
//!
//! # Endpoints
//!
//! | Method              | Path              | Description                         |
//! |----------------------|-------------------|--------------------------------------|
//! | `GET`                | `/health`         | Liveness probe                       |
//! | `GET`, `POST`         | `/targets`        | List / create forwarding targets     |
//! | `PUT`, `DELETE`       | `/targets/{id}`   | Update / remove a target             |
//! | `GET`, `POST`         | `/routes`         | List / register inbound routes       |
//! | `PUT`, `DELETE`       | `/routes/{*path}` | Merge-update / deregister a route    |
//! | `GET`                 | `/history`        | Recently received messages           |
//! | `POST`                | `/test`           | Send a synthetic test message        |
//! | (any unmatched path)  | —                 | Dynamic webhook dispatch             |
//!
//! # Example
//!
//! ```rust,no_run
//! use webhook_forwarder::server::{GatewayServer, GatewayServerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let server = GatewayServer::new(GatewayServerConfig::default());
//!     server.start().await.unwrap();
//! }
//! ```

pub mod admission;
pub mod config;
pub mod decode;
pub mod dispatch;
pub mod eligibility;
pub mod error;
pub mod format;
pub mod handlers;
pub mod history;
pub mod server;
pub mod state;
pub mod transform;
pub mod value;

pub use error::{GatewayError, GatewayResult};
pub use server::{GatewayServer, GatewayServerConfig};
pub use state::AppState;
