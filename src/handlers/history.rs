//! `GET /history` — recently received messages, newest first.

use crate::state::AppState;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    10
}

pub async fn get_history(State(state): State<AppState>, Query(q): Query<HistoryQuery>) -> Json<Value> {
    let entries = state.history.recent(q.limit);
    Json(json!({ "history": entries, "total": state.history.len() }))
}
