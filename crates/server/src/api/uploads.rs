//! Name-guarded upload API handler.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

use crate::state::AppState;

/// Request body for a guarded upload.
#[derive(Debug, Deserialize)]
pub struct UploadBody {
    pub file_name: String,
    pub file_path: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub file_id: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

fn error(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            message: message.into(),
        }),
    )
}

/// Upload a local file unless an item with the same name already exists.
pub async fn guarded_upload(
    State(state): State<Arc<AppState>>,
    Json(body): Json<UploadBody>,
) -> Result<Json<UploadResponse>, (StatusCode, Json<ErrorResponse>)> {
    if body.file_name.is_empty() || body.file_path.is_empty() {
        return Err(error(
            StatusCode::BAD_REQUEST,
            "file_name and file_path are required",
        ));
    }

    let folder_id = &state.config().remote_store.upload_folder_id;
    if folder_id.is_empty() {
        return Err(error(
            StatusCode::SERVICE_UNAVAILABLE,
            "No upload folder configured",
        ));
    }

    let store = state.store();

    let exists = store.exists(&body.file_name).await.map_err(|e| {
        error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    if exists {
        return Err(error(StatusCode::BAD_REQUEST, "File already exists"));
    }

    let item = store
        .put(&body.file_name, &PathBuf::from(&body.file_path), folder_id)
        .await
        .map_err(|e| error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(UploadResponse {
        message: "File uploaded successfully".to_string(),
        file_id: item.id,
    }))
}
