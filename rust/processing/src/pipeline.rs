// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Face generation pipeline for one stored document.
//!
//! fetch → read tags → tessellate → resolve destination → write, with a
//! status entry after each stage. Any failure records an `error: ...` status
//! and aborts the document; retries are up to whoever triggered the run.

use crate::document::ModelDocument;
use crate::error::{Error, Result};
use crate::store::{BlobStore, PipelineStatus, StatusStore};
use crate::tags::DESTINATION_TAG;
use crate::tessellate::{tessellate_document, DocumentReport};
use facegen_geometry::TessellationOptions;
use std::sync::Arc;

/// Result of a successful run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutcome {
    pub name: String,
    pub destination: String,
    pub key: String,
    pub report: DocumentReport,
    /// Status entries written during the run
    pub checkpoints: usize,
}

/// State of one run, passed from stage to stage
#[derive(Debug)]
struct PipelineRun<'a> {
    bucket: &'a str,
    key: &'a str,
    name: String,
    checkpoints: usize,
}

/// Decode an object key as delivered in a storage event: `+` stands for a
/// space and other characters may be percent-encoded.
pub fn decode_event_key(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'+' => decoded.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                match (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        decoded.push(hi << 4 | lo);
                        i += 2;
                    }
                    _ => decoded.push(b'%'),
                }
            }
            b => decoded.push(b),
        }
        i += 1;
    }

    String::from_utf8_lossy(&decoded).into_owned()
}

#[inline]
fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Model name for an object key: file name without `.json`
pub fn object_name(key: &str) -> String {
    let file = key.rsplit('/').next().unwrap_or(key);
    file.strip_suffix(".json").unwrap_or(file).to_string()
}

/// Generates faces for stored documents and moves them to their destination.
#[derive(Clone)]
pub struct FacesPipeline {
    blobs: Arc<dyn BlobStore>,
    statuses: Arc<dyn StatusStore>,
    options: TessellationOptions,
    parallel: bool,
}

impl FacesPipeline {
    pub fn new(blobs: Arc<dyn BlobStore>, statuses: Arc<dyn StatusStore>) -> Self {
        Self {
            blobs,
            statuses,
            options: TessellationOptions::default(),
            parallel: false,
        }
    }

    pub fn with_options(mut self, options: TessellationOptions) -> Self {
        self.options = options;
        self
    }

    /// Spread elements over the rayon pool
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Process `bucket/key`.
    pub fn run(&self, bucket: &str, key: &str) -> Result<PipelineOutcome> {
        let mut run = PipelineRun {
            bucket,
            key,
            name: object_name(key),
            checkpoints: 0,
        };

        tracing::info!(bucket = %bucket, key = %key, model = %run.name, "Generating faces");

        match self.run_stages(&mut run) {
            Ok((destination, report)) => {
                self.checkpoint(
                    &mut run,
                    PipelineStatus::Complete,
                    &format!("wrote {}/{}", destination, key),
                )?;
                tracing::info!(
                    bucket = %bucket,
                    key = %key,
                    destination = %destination,
                    faces = report.face_count,
                    warnings = report.warnings.len(),
                    "Successfully tessellated"
                );
                Ok(PipelineOutcome {
                    name: run.name,
                    destination,
                    key: key.to_string(),
                    report,
                    checkpoints: run.checkpoints,
                })
            }
            Err(err) => {
                tracing::error!(bucket = %bucket, key = %key, error = %err, "Unable to tessellate");
                let message = err.to_string();
                if let Err(status_err) =
                    self.checkpoint(&mut run, PipelineStatus::Error(message.clone()), &message)
                {
                    tracing::error!(error = %status_err, model = %run.name, "Failed to record error status");
                }
                Err(err)
            }
        }
    }

    fn run_stages(&self, run: &mut PipelineRun<'_>) -> Result<(String, DocumentReport)> {
        let body = self.blobs.get_object(run.bucket, run.key)?;
        self.checkpoint(
            run,
            PipelineStatus::Received,
            &format!("fetched {}/{} ({} bytes)", run.bucket, run.key, body.len()),
        )?;

        let content = std::str::from_utf8(&body)
            .map_err(|e| crate::error::ValidationError::Malformed(e.to_string()))?;
        let mut document = ModelDocument::from_json_str(content)?;

        let mut tags = self.blobs.get_object_tagging(run.bucket, run.key)?;
        self.checkpoint(
            run,
            PipelineStatus::Processing,
            &format!("read {} tag(s)", tags.len()),
        )?;

        let report = tessellate_document(&mut document, &self.options, self.parallel);
        self.checkpoint(
            run,
            PipelineStatus::Processing,
            &format!(
                "tessellated {} element(s) into {} face(s), {} without faces",
                report.element_count,
                report.face_count,
                report.warnings.len()
            ),
        )?;

        let destination = tags
            .take(DESTINATION_TAG)
            .ok_or_else(|| Error::MissingDestination {
                key: run.key.to_string(),
            })?;
        document.remove_destination();

        let body = document.to_json_vec()?;
        self.blobs.put_object(&destination, run.key, body, &tags)?;

        Ok((destination, report))
    }

    fn checkpoint(
        &self,
        run: &mut PipelineRun<'_>,
        status: PipelineStatus,
        message: &str,
    ) -> Result<()> {
        run.checkpoints += 1;
        tracing::debug!(model = %run.name, step = run.checkpoints, status = %status, "{}", message);
        self.statuses.record(&run.name, &status, message)?;
        Ok(())
    }
}
