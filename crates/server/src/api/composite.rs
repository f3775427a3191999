//! Batch workflow API handler.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use drobe_core::{CompositeRequest, ImageRef, WorkflowError};

use crate::state::AppState;

/// Request body for the batch workflow.
///
/// The wire shape is kept compatible with the UI that already posts
/// `likedImages`.
#[derive(Debug, Deserialize)]
pub struct CompositeBody {
    #[serde(rename = "likedImages")]
    pub liked_images: Vec<ImageRefBody>,
}

#[derive(Debug, Deserialize)]
pub struct ImageRefBody {
    pub url: String,
    pub name: String,
}

/// Success response of the batch workflow.
#[derive(Debug, Serialize)]
pub struct CompositeResponse {
    pub message: String,
    #[serde(rename = "googleDriveFileId")]
    pub file_id: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

/// Run the full batch workflow: download, composite, republish.
pub async fn run_workflow(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CompositeBody>,
) -> Result<Json<CompositeResponse>, (StatusCode, Json<ErrorResponse>)> {
    let request = CompositeRequest {
        images: body
            .liked_images
            .into_iter()
            .map(|i| ImageRef {
                url: i.url,
                name: i.name,
            })
            .collect(),
    };

    match state.composite().handle(request).await {
        Ok(outcome) => Ok(Json(CompositeResponse {
            message: "Workflow completed successfully.".to_string(),
            file_id: outcome.item_id,
        })),
        Err(e) => {
            let status = match &e {
                WorkflowError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                WorkflowError::NoInputAvailable => StatusCode::UNPROCESSABLE_ENTITY,
                WorkflowError::Processing(_)
                | WorkflowError::Upload(_)
                | WorkflowError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            Err((
                status,
                Json(ErrorResponse {
                    message: e.to_string(),
                }),
            ))
        }
    }
}
