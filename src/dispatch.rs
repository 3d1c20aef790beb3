//! Concurrent fan-out of a transformed message to a set of targets.
//!
//! Each target is dispatched independently and concurrently; one target's
//! failure or timeout never affects another's outcome.

use crate::config::Target;
use crate::format::format_for_target;
use futures::future::join_all;
use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};

/// Default per-target request timeout when a target doesn't override it.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// The result of attempting to deliver to one target.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DispatchOutcome {
    pub target_id: String,
    pub target_name: String,
    pub success: bool,
    pub status: Option<u16>,
    pub error: Option<String>,
}

/// Deliver `message` to every target in `targets` concurrently, returning one
/// outcome per target in the same order.
pub async fn dispatch_to_targets(
    client: &reqwest::Client,
    message: &Value,
    targets: &[Target],
) -> Vec<DispatchOutcome> {
    let futures = targets.iter().map(|target| dispatch_one(client, message, target));
    join_all(futures).await
}

async fn dispatch_one(client: &reqwest::Client, message: &Value, target: &Target) -> DispatchOutcome {
    let body = format_for_target(message, target);
    let timeout = Duration::from_secs(target.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS));

    let mut request = client.post(&target.url).json(&body).timeout(timeout);
    if let Some(headers) = &target.headers {
        for (key, value) in headers {
            request = request.header(key, value);
        }
    }

    match request.send().await {
        Ok(response) => {
            let status = response.status();
            if status.is_success() {
                info!(target = %target.name, status = status.as_u16(), "delivered to target");
                DispatchOutcome {
                    target_id: target.id.clone(),
                    target_name: target.name.clone(),
                    success: true,
                    status: Some(status.as_u16()),
                    error: None,
                }
            } else {
                warn!(target = %target.name, status = status.as_u16(), "target rejected delivery");
                DispatchOutcome {
                    target_id: target.id.clone(),
                    target_name: target.name.clone(),
                    success: false,
                    status: Some(status.as_u16()),
                    error: Some(format!("target responded with status {status}")),
                }
            }
        }
        Err(e) => {
            warn!(target = %target.name, error = %e, "delivery to target failed");
            DispatchOutcome {
                target_id: target.id.clone(),
                target_name: target.name.clone(),
                success: false,
                status: None,
                error: Some(e.to_string()),
            }
        }
    }
}
