// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Model upload and retrieval endpoints.

use crate::error::ApiError;
use crate::services::upload_stamp;
use crate::types::UploadResponse;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use facegen_processing::{
    list_models, model_data, model_status, validate_upload, ModelStatus, ModelSummary,
};
use serde_json::Value;
use time::OffsetDateTime;

/// POST /api/v1/models - Validate and store an upload.
///
/// Models with planar elements are staged and their faces generated in the
/// background.
pub async fn upload(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<UploadResponse>, ApiError> {
    let stamp = upload_stamp(OffsetDateTime::now_utc());
    let settings = state.config.upload_settings();
    let receipt = validate_upload(body, &stamp, &settings, state.blobs.as_ref())?;

    if receipt.staged {
        let pipeline = state.pipeline.clone();
        let bucket = receipt.bucket.clone();
        let key = receipt.key.clone();
        tokio::task::spawn_blocking(move || {
            if let Err(e) = pipeline.run(&bucket, &key) {
                tracing::warn!(bucket = %bucket, key = %key, error = %e, "Background face generation failed");
            }
        });
    }

    Ok(Json(UploadResponse {
        success: true,
        receipt,
    }))
}

/// GET /api/v1/models - List stored models.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ModelSummary>>, ApiError> {
    let models = list_models(
        state.blobs.as_ref(),
        &state.config.site_bucket,
        &state.config.data_folder,
    )?;
    Ok(Json(models))
}

/// GET /api/v1/models/:name - Retrieve a stored model.
pub async fn get(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let document = model_data(
        state.blobs.as_ref(),
        &state.config.site_bucket,
        &state.config.data_folder,
        &name,
    )?;
    Ok(Json(document))
}

/// GET /api/v1/models/:name/status - Latest pipeline status.
pub async fn status(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ModelStatus>, ApiError> {
    Ok(Json(model_status(state.statuses.as_ref(), &name)?))
}
