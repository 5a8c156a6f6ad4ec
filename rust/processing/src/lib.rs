// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Facegen Processing
//!
//! Everything around the tessellation core: the model document format and its
//! validation, per-document face generation, upload validation, the read-side
//! catalogue, object tags, storage collaborators, and the pipeline that ties
//! them together.

pub mod catalog;
pub mod document;
pub mod error;
pub mod pipeline;
pub mod store;
pub mod tags;
pub mod tessellate;
pub mod upload;

pub use catalog::{list_models, model_data, model_status, ModelStatus, ModelSummary};
pub use document::{ModelDocument, Payload, PlanarElement};
pub use error::{CatalogError, Error, Result, UploadError, UpstreamError, ValidationError};
pub use pipeline::{decode_event_key, object_name, FacesPipeline, PipelineOutcome};
pub use store::{
    BlobStore, InMemoryBlobStore, InMemoryStatusStore, ObjectSummary, PipelineStatus, StatusRecord,
    StatusStore,
};
pub use tags::{TagSet, DESTINATION_TAG};
pub use tessellate::{tessellate_document, tessellate_elements, DocumentReport, ElementWarning};
pub use upload::{validate_upload, UploadReceipt, UploadSettings};

pub use facegen_geometry::{AxisStrategy, ClosureTolerance, TessellationOptions};
