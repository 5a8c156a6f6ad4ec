// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Document tessellation and upload helpers run off the async runtime.

use crate::error::ApiError;
use crate::types::{ProcessingStats, TessellateResponse};
use facegen_geometry::TessellationOptions;
use facegen_processing::{tessellate_document, ModelDocument};
use serde_json::Value;
use time::macros::format_description;
use time::OffsetDateTime;

/// Validate and tessellate a document.
pub fn tessellate_value(
    value: Value,
    options: &TessellationOptions,
    parallel: bool,
) -> Result<TessellateResponse, ApiError> {
    let start = std::time::Instant::now();

    let mut document = ModelDocument::from_value(value)?;
    tracing::info!(
        elements = document.payload.planar_elements.len(),
        parallel,
        "Starting tessellation"
    );

    let report = tessellate_document(&mut document, options, parallel);
    let total_time_ms = start.elapsed().as_millis() as u64;

    tracing::info!(
        faces = report.face_count,
        fallback = report.fallback_count,
        warnings = report.warnings.len(),
        total_time_ms,
        "Tessellation complete"
    );

    Ok(TessellateResponse {
        document,
        stats: ProcessingStats::from_report(report, total_time_ms),
    })
}

/// Stamp appended to uploaded model names (`YYMMDD_hhmmss`).
pub fn upload_stamp(at: OffsetDateTime) -> String {
    at.format(format_description!(
        "[year repr:last_two][month][day]_[hour][minute][second]"
    ))
    .unwrap_or_else(|_| at.unix_timestamp().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use facegen_processing::ValidationError;
    use serde_json::json;
    use time::macros::datetime;

    #[test]
    fn test_upload_stamp() {
        assert_eq!(upload_stamp(datetime!(2024-01-02 03:04:05 UTC)), "240102_030405");
    }

    #[test]
    fn test_tessellate_value() {
        let response = tessellate_value(
            json!({"payload": {"planarElements": [
                {"vertices": [[0, 0, 0], [1, 0, 0], [1, 0, 1], [0, 0, 1]]}
            ]}}),
            &TessellationOptions::default(),
            false,
        )
        .unwrap();

        assert_eq!(response.stats.total_faces, 2);
        assert_eq!(response.stats.fallback_elements, 1);
        assert_eq!(response.document.payload.planar_elements[0].face_vertices.len(), 2);
    }

    #[test]
    fn test_tessellate_value_rejects_missing_payload() {
        let err = tessellate_value(json!({"modelInformation": {}}), &TessellationOptions::default(), false)
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(ValidationError::MissingPayload)));
    }
}
