// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Direct tessellation endpoint.

use crate::error::ApiError;
use crate::services::tessellate_value;
use crate::types::TessellateResponse;
use crate::AppState;
use axum::{extract::State, Json};
use serde_json::Value;

/// POST /api/v1/tessellate - Tessellate a document without storing it.
pub async fn tessellate(
    State(state): State<AppState>,
    Json(document): Json<Value>,
) -> Result<Json<TessellateResponse>, ApiError> {
    let options = state.config.tessellation_options();
    let parallel = state.config.parallel_elements;

    // CPU-bound, keep it off the async workers
    let response =
        tokio::task::spawn_blocking(move || tessellate_value(document, &options, parallel)).await??;

    Ok(Json(response))
}
