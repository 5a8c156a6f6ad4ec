// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for document processing and the surrounding I/O.

use thiserror::Error;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// The input document cannot be tessellated. Raised before any element is touched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("document root must be a JSON object")]
    NotAnObject,

    #[error("document has no 'payload'")]
    MissingPayload,

    #[error("document has no 'payload.planarElements'")]
    MissingPlanarElements,

    #[error("'payload.planarElements' must be a list")]
    InvalidPlanarElements,

    #[error("planar element {index} is malformed: {reason}")]
    InvalidElement { index: usize, reason: String },

    #[error("malformed document: {0}")]
    Malformed(String),
}

/// Failures of the blob store or status store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UpstreamError {
    #[error("object {bucket}/{key} not found")]
    NotFound { bucket: String, key: String },

    #[error("{0} lock poisoned")]
    LockPoisoned(&'static str),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Reasons an uploaded model is rejected.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("'modelInformation' and 'payload' properties are required")]
    MissingSections,

    #[error("'modelInformation' must contain 'units' and 'name'")]
    MissingModelInfoKeys,

    #[error("'units' values must be either 'imperial' or 'metric'")]
    InvalidUnits,

    #[error("'payload' must be a list of elements")]
    InvalidPayload,

    #[error("'payload' must include 'vertices' and 'metadata' for each element")]
    MissingPayloadKeys,

    #[error("'vertices' data is empty")]
    EmptyVertices,

    #[error("'metadata' field is empty")]
    EmptyMetadata,

    #[error("File with this name already exists in S3 bucket. Please rename file and try again.")]
    AlreadyExists,

    #[error("model could not be stored: {0}")]
    Store(#[from] UpstreamError),

    #[error("model could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Lookups against stored models.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("model not found: {0}")]
    NotFound(String),

    #[error("stored model is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error(transparent)]
    Upstream(UpstreamError),
}

impl From<UpstreamError> for CatalogError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::NotFound { key, .. } => CatalogError::NotFound(key),
            other => CatalogError::Upstream(other),
        }
    }
}

/// Errors that abort the face generation pipeline for a document
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid document: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no 'destination' tag on {key}")]
    MissingDestination { key: String },
}
