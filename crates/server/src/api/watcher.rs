//! Watcher API handlers.

use axum::{extract::State, Json};
use std::sync::Arc;

use drobe_core::PollerStatus;

use crate::state::AppState;

/// Current watcher status; a disabled watcher reports as not running.
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<PollerStatus> {
    let status = state
        .poller()
        .map(|p| p.status())
        .unwrap_or_default();
    Json(status)
}
