//! Request handlers: control API (targets, routes, history, test) plus the
//! dynamic webhook fallback.

pub mod history;
pub mod routes;
pub mod targets;
pub mod test_dispatch;
pub mod webhook;

pub use history::get_history;
pub use routes::{create_route, delete_route, list_routes, update_route};
pub use targets::{create_target, delete_target, list_targets, update_target};
pub use test_dispatch::send_test_message;
pub use webhook::webhook_fallback;
