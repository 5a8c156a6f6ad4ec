// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response types for the API.

use facegen_processing::{DocumentReport, ElementWarning, ModelDocument, UploadReceipt};
use serde::Serialize;

/// Tessellated document with statistics.
#[derive(Debug, Clone, Serialize)]
pub struct TessellateResponse {
    pub document: ModelDocument,
    pub stats: ProcessingStats,
}

/// Processing statistics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProcessingStats {
    /// Number of planar elements.
    pub total_elements: usize,
    /// Total number of faces generated.
    pub total_faces: usize,
    /// Elements that needed the rotation fallback.
    pub fallback_elements: usize,
    /// Elements left without faces.
    pub warnings: Vec<ElementWarning>,
    /// Total processing time (ms).
    pub total_time_ms: u64,
}

impl ProcessingStats {
    pub fn from_report(report: DocumentReport, total_time_ms: u64) -> Self {
        Self {
            total_elements: report.element_count,
            total_faces: report.face_count,
            fallback_elements: report.fallback_count,
            warnings: report.warnings,
            total_time_ms,
        }
    }
}

/// Accepted upload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(flatten)]
    pub receipt: UploadReceipt,
}

/// Result of handling an object-created event.
#[derive(Debug, Clone, Serialize)]
pub struct EventResponse {
    pub model: String,
    pub destination: String,
    pub key: String,
    pub stats: ProcessingStats,
}
