//! Load/persist the [`WebhookConfig`] document from/to disk.
//!
//! Mirrors the source's `_load_config`/`_save_config`: a missing file seeds
//! a default document on disk; a present-but-incomplete document is
//! back-filled in memory (and the back-fill is logged as a warning); write
//! failures are logged but never fatal — the in-memory copy stays
//! authoritative regardless of whether the write landed.

use super::model::WebhookConfig;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{error, info, warn};

/// Single-writer, many-reader store over the persisted config document.
pub struct ConfigStore {
    path: PathBuf,
    inner: RwLock<WebhookConfig>,
}

impl ConfigStore {
    /// Load (or seed) the document at `path`.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let config = load_or_seed(&path).await;
        Self {
            path,
            inner: RwLock::new(config),
        }
    }

    /// A consistent point-in-time copy of the document, safe to read from
    /// without holding any lock across `.await` points.
    pub async fn snapshot(&self) -> WebhookConfig {
        self.inner.read().await.clone()
    }

    /// Apply `f` to the document under the writer lock, then persist the
    /// result. Returns whatever `f` returns.
    pub async fn mutate<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut WebhookConfig) -> T,
    {
        let mut guard = self.inner.write().await;
        let result = f(&mut guard);
        persist(&self.path, &guard).await;
        result
    }
}

async fn load_or_seed(path: &Path) -> WebhookConfig {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                error!(path = %parent.display(), error = %e, "failed to create config directory");
            }
        }
    }

    match tokio::fs::read_to_string(path).await {
        Ok(raw) => match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(mut value) => {
                back_fill(&mut value);
                match serde_json::from_value(value) {
                    Ok(config) => {
                        info!(path = %path.display(), "loaded webhook config");
                        config
                    }
                    Err(e) => {
                        error!(path = %path.display(), error = %e, "config file is malformed, falling back to defaults");
                        WebhookConfig::default()
                    }
                }
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "config file is not valid JSON, falling back to defaults");
                WebhookConfig::default()
            }
        },
        Err(_) => {
            let default = WebhookConfig::default();
            warn!(path = %path.display(), "no config file found, seeding defaults");
            persist(path, &default).await;
            default
        }
    }
}

/// Back-fill missing top-level `routes`/`templates` keys in place, logging
/// a warning for each — matches the source's explicit per-key checks.
fn back_fill(value: &mut serde_json::Value) {
    let Some(obj) = value.as_object_mut() else {
        return;
    };
    if !obj.contains_key("routes") {
        warn!("config file is missing 'routes', backfilling defaults");
        obj.insert(
            "routes".to_string(),
            serde_json::to_value(WebhookConfig::default().routes).unwrap(),
        );
    }
    if !obj.contains_key("templates") {
        warn!("config file is missing 'templates', backfilling defaults");
        obj.insert(
            "templates".to_string(),
            serde_json::to_value(WebhookConfig::default().templates).unwrap(),
        );
    }
}

async fn persist(path: &Path, config: &WebhookConfig) {
    let rendered = match serde_json::to_string_pretty(config) {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "failed to serialize config, not persisting");
            return;
        }
    };
    if let Err(e) = tokio::fs::write(path, rendered).await {
        error!(path = %path.display(), error = %e, "failed to persist config, in-memory copy remains authoritative");
    }
}
