// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Storage event endpoint.

use crate::error::ApiError;
use crate::types::{EventResponse, ObjectCreatedEvent, ProcessingStats};
use crate::AppState;
use axum::{extract::State, Json};
use facegen_processing::decode_event_key;

/// POST /api/v1/events/object-created - Generate faces for a staged object.
pub async fn object_created(
    State(state): State<AppState>,
    Json(event): Json<ObjectCreatedEvent>,
) -> Result<Json<EventResponse>, ApiError> {
    let key = decode_event_key(&event.key);
    let bucket = event.bucket;
    tracing::info!(bucket = %bucket, key = %key, "Object created");

    let pipeline = state.pipeline.clone();
    let start = std::time::Instant::now();
    let outcome = tokio::task::spawn_blocking(move || pipeline.run(&bucket, &key)).await??;

    Ok(Json(EventResponse {
        model: outcome.name,
        destination: outcome.destination,
        key: outcome.key,
        stats: ProcessingStats::from_report(outcome.report, start.elapsed().as_millis() as u64),
    }))
}
