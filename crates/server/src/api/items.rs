//! Item flag API handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use drobe_core::{ItemFlags, StateStoreError};

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub message: String,
    pub liked: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

fn map_error(e: StateStoreError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &e {
        StateStoreError::DocumentNotFound(_) => StatusCode::NOT_FOUND,
        StateStoreError::AuthenticationFailed(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            message: e.to_string(),
        }),
    )
}

fn no_state_store() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(ErrorResponse {
            message: "No state store configured".to_string(),
        }),
    )
}

/// Flip the liked flag of an item.
pub async fn toggle_like(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<String>,
) -> Result<Json<LikeResponse>, (StatusCode, Json<ErrorResponse>)> {
    let store = state.state_store().ok_or_else(no_state_store)?;

    let liked = store.toggle_liked(&item_id).await.map_err(map_error)?;

    Ok(Json(LikeResponse {
        message: if liked {
            "Image liked".to_string()
        } else {
            "Image unliked".to_string()
        },
        liked,
    }))
}

/// Read the flags of an item.
pub async fn get_flags(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<String>,
) -> Result<Json<ItemFlags>, (StatusCode, Json<ErrorResponse>)> {
    let store = state.state_store().ok_or_else(no_state_store)?;

    let flags = store.get_flags(&item_id).await.map_err(map_error)?;
    Ok(Json(flags))
}
