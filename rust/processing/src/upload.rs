// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Validation and storage of uploaded models.
//!
//! An upload carries `modelInformation` and a flat `payload` list. Elements
//! with more than two vertices are planar, the rest linear. Models with
//! planar elements go to the staging bucket with a `destination` pointing at
//! the site bucket, so the faces pipeline picks them up; the others go
//! straight to the site bucket.

use crate::error::UploadError;
use crate::store::BlobStore;
use crate::tags::{TagSet, DESTINATION_TAG};
use serde::Serialize;
use serde_json::{json, Value};

/// Unit systems a model may declare
pub const VALID_UNITS: [&str; 2] = ["metric", "imperial"];

/// Where uploads are stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSettings {
    /// Bucket models are served from
    pub site_bucket: String,
    /// Bucket for models waiting on face generation
    pub staging_bucket: String,
    /// Key prefix (without trailing slash) for model documents
    pub data_folder: String,
}

impl UploadSettings {
    /// Object key of a model document
    pub fn model_key(&self, name: &str) -> String {
        format!("{}/{}.json", self.data_folder, name)
    }
}

/// What was stored for an accepted upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadReceipt {
    pub name: String,
    pub bucket: String,
    pub key: String,
    /// True when the model went to staging for face generation
    pub staged: bool,
    pub planar_count: usize,
    pub linear_count: usize,
}

/// Empty the way a JSON consumer would treat it: null, false, zero, or an
/// empty string, list or object
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn basename(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// Validate an uploaded model and store it.
///
/// `stamp` is appended to the model name (`<name>_<stamp>`) to keep names
/// unique. Nothing is stored unless every check passes.
pub fn validate_upload(
    mut upload: Value,
    stamp: &str,
    settings: &UploadSettings,
    store: &dyn BlobStore,
) -> Result<UploadReceipt, UploadError> {
    let root = upload.as_object_mut().ok_or(UploadError::MissingSections)?;
    if !root.contains_key("modelInformation") || !root.contains_key("payload") {
        return Err(UploadError::MissingSections);
    }

    let name = {
        let info = root
            .get_mut("modelInformation")
            .and_then(Value::as_object_mut)
            .ok_or(UploadError::MissingModelInfoKeys)?;
        let (Some(name), Some(units)) = (info.get("name"), info.get("units")) else {
            return Err(UploadError::MissingModelInfoKeys);
        };
        let name = format!("{}_{}", display_value(name), stamp);
        if !units.as_str().is_some_and(|u| VALID_UNITS.contains(&u)) {
            return Err(UploadError::InvalidUnits);
        }
        info.insert("name".to_string(), Value::String(name.clone()));
        name
    };

    let elements = match root.remove("payload") {
        Some(Value::Array(elements)) => elements,
        _ => return Err(UploadError::InvalidPayload),
    };

    let mut planar = Vec::new();
    let mut linear = Vec::new();
    for element in elements {
        let (Some(vertices), Some(metadata)) = (element.get("vertices"), element.get("metadata")) else {
            return Err(UploadError::MissingPayloadKeys);
        };
        if is_blank(vertices) {
            return Err(UploadError::EmptyVertices);
        }
        if is_blank(metadata) {
            return Err(UploadError::EmptyMetadata);
        }
        let vertex_count = vertices.as_array().map_or(0, Vec::len);
        if vertex_count > 2 {
            planar.push(element);
        } else {
            linear.push(element);
        }
    }

    let planar_count = planar.len();
    let linear_count = linear.len();
    root.insert(
        "payload".to_string(),
        json!({ "linearElements": linear, "planarElements": planar }),
    );

    let file_name = format!("{}.json", name).to_lowercase();
    let exists = store
        .list_objects(&settings.site_bucket, "")?
        .iter()
        .any(|o| basename(&o.key).to_lowercase() == file_name);
    if exists {
        return Err(UploadError::AlreadyExists);
    }

    let staged = planar_count > 0;
    let info = root
        .get_mut("modelInformation")
        .and_then(Value::as_object_mut)
        .ok_or(UploadError::MissingModelInfoKeys)?;
    if staged {
        info.insert(
            DESTINATION_TAG.to_string(),
            Value::String(settings.site_bucket.clone()),
        );
    }
    let tags = TagSet::from_json_object(info);

    let bucket = if staged {
        settings.staging_bucket.clone()
    } else {
        settings.site_bucket.clone()
    };
    let key = settings.model_key(&name);

    let body = serde_json::to_vec(&upload)?;
    store.put_object(&bucket, &key, body, &tags)?;

    tracing::info!(
        model = %name,
        bucket = %bucket,
        planar = planar_count,
        linear = linear_count,
        staged,
        "Stored uploaded model"
    );

    Ok(UploadReceipt {
        name,
        bucket,
        key,
        staged,
        planar_count,
        linear_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryBlobStore;

    fn settings() -> UploadSettings {
        UploadSettings {
            site_bucket: "site".into(),
            staging_bucket: "staging".into(),
            data_folder: "data".into(),
        }
    }

    fn upload() -> Value {
        json!({
            "modelInformation": {"name": "tower", "units": "metric"},
            "payload": [
                {"vertices": [[0, 0, 0], [1, 0, 0], [1, 1, 0]], "metadata": {"kind": "slab"}},
                {"vertices": [[0, 0, 0], [0, 0, 3]], "metadata": {"kind": "column"}}
            ]
        })
    }

    #[test]
    fn test_planar_model_is_staged() {
        let store = InMemoryBlobStore::new();
        let receipt = validate_upload(upload(), "240101_120000", &settings(), &store).unwrap();

        assert_eq!(receipt.name, "tower_240101_120000");
        assert_eq!(receipt.bucket, "staging");
        assert_eq!(receipt.key, "data/tower_240101_120000.json");
        assert!(receipt.staged);
        assert_eq!((receipt.planar_count, receipt.linear_count), (1, 1));

        let stored: Value =
            serde_json::from_slice(&store.get_object("staging", &receipt.key).unwrap()).unwrap();
        assert_eq!(stored["modelInformation"]["destination"], json!("site"));
        assert_eq!(stored["payload"]["planarElements"].as_array().unwrap().len(), 1);
        assert_eq!(stored["payload"]["linearElements"].as_array().unwrap().len(), 1);

        let tags = store.get_object_tagging("staging", &receipt.key).unwrap();
        assert_eq!(tags.get("destination"), Some("site"));
        assert_eq!(tags.get("units"), Some("metric"));
        assert_eq!(tags.get("name"), Some("tower_240101_120000"));
    }

    #[test]
    fn test_linear_only_model_goes_to_site() {
        let store = InMemoryBlobStore::new();
        let mut model = upload();
        model["payload"].as_array_mut().unwrap().remove(0);

        let receipt = validate_upload(model, "s", &settings(), &store).unwrap();
        assert!(!receipt.staged);
        assert_eq!(receipt.bucket, "site");
        let tags = store.get_object_tagging("site", &receipt.key).unwrap();
        assert_eq!(tags.get("destination"), None);
    }

    #[test]
    fn test_rejections() {
        let store = InMemoryBlobStore::new();
        let run = |v: Value| validate_upload(v, "s", &settings(), &store).unwrap_err();

        assert!(matches!(run(json!({"payload": []})), UploadError::MissingSections));
        assert!(matches!(
            run(json!({"modelInformation": {"name": "a"}, "payload": []})),
            UploadError::MissingModelInfoKeys
        ));
        assert!(matches!(
            run(json!({"modelInformation": {"name": "a", "units": "cubits"}, "payload": []})),
            UploadError::InvalidUnits
        ));
        assert!(matches!(
            run(json!({"modelInformation": {"name": "a", "units": "metric"}, "payload": {}})),
            UploadError::InvalidPayload
        ));
        assert!(matches!(
            run(json!({"modelInformation": {"name": "a", "units": "metric"}, "payload": [{"vertices": [[0, 0, 0]]}]})),
            UploadError::MissingPayloadKeys
        ));
        assert!(matches!(
            run(json!({"modelInformation": {"name": "a", "units": "metric"}, "payload": [{"vertices": [], "metadata": {"a": 1}}]})),
            UploadError::EmptyVertices
        ));
        assert!(matches!(
            run(json!({"modelInformation": {"name": "a", "units": "metric"}, "payload": [{"vertices": [[0, 0, 0]], "metadata": {}}]})),
            UploadError::EmptyMetadata
        ));
        assert!(store.list_objects("site", "").unwrap().is_empty());
        assert!(store.list_objects("staging", "").unwrap().is_empty());
    }

    #[test]
    fn test_existing_name_rejected() {
        let store = InMemoryBlobStore::new();
        store
            .put_object("site", "data/Tower_s.json", vec![], &TagSet::new())
            .unwrap();

        let err = validate_upload(upload(), "s", &settings(), &store).unwrap_err();
        assert!(matches!(err, UploadError::AlreadyExists));
    }

    #[test]
    fn test_blank_values() {
        assert!(is_blank(&json!(null)));
        assert!(is_blank(&json!(0)));
        assert!(is_blank(&json!("")));
        assert!(!is_blank(&json!([[0, 0, 0]])));
        assert!(!is_blank(&json!({"a": null})));
    }
}
