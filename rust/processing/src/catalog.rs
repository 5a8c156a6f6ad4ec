// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Read side of stored models: listing, retrieval and status lookup.

use crate::error::CatalogError;
use crate::store::{BlobStore, StatusStore};
use serde::Serialize;
use serde_json::{json, Map, Value};
use time::macros::format_description;
use time::OffsetDateTime;

/// A stored model with its tags and upload time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSummary {
    pub model: String,
    pub s3_attributes: Map<String, Value>,
}

/// Latest pipeline status of a model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelStatus {
    pub name: String,
    pub latest_status: String,
    pub latest_log_message: String,
}

/// `YYYY-MM-DD hh:mm:ss`, without offset
pub fn format_upload_time(at: OffsetDateTime) -> String {
    at.format(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second]"
    ))
    .unwrap_or_else(|_| at.unix_timestamp().to_string())
}

/// List the models stored under `folder` in `bucket`.
pub fn list_models(
    store: &dyn BlobStore,
    bucket: &str,
    folder: &str,
) -> Result<Vec<ModelSummary>, CatalogError> {
    let prefix = format!("{}/", folder);
    let mut models = Vec::new();

    for object in store.list_objects(bucket, &prefix)? {
        if object.key == prefix {
            continue;
        }
        let mut attributes = store.get_object_tagging(bucket, &object.key)?.to_json_object();
        attributes.insert(
            "uploadTime".to_string(),
            Value::String(format_upload_time(object.last_modified)),
        );
        models.push(ModelSummary {
            model: object.key.replacen(&prefix, "", 1).replace(".json", ""),
            s3_attributes: attributes,
        });
    }

    Ok(models)
}

/// Fetch a stored model by name.
///
/// The upload time is added under `modelInformation.s3_attributes`. Legacy
/// documents whose payload is a bare element list are returned with that list
/// as `linearElements` and no planar elements.
pub fn model_data(
    store: &dyn BlobStore,
    bucket: &str,
    folder: &str,
    name: &str,
) -> Result<Value, CatalogError> {
    let key = format!("{}/{}.json", folder, name);
    let body = store
        .get_object(bucket, &key)
        .map_err(|_| CatalogError::NotFound(name.to_string()))?;
    let head = store.head_object(bucket, &key)?;

    let mut document: Value = serde_json::from_slice(&body)?;
    let root = document
        .as_object_mut()
        .ok_or_else(|| CatalogError::NotFound(name.to_string()))?;

    let info = root
        .entry("modelInformation")
        .or_insert_with(|| Value::Object(Map::new()));
    if let Some(info) = info.as_object_mut() {
        info.insert(
            "s3_attributes".to_string(),
            json!({ "uploadTime": format_upload_time(head.last_modified) }),
        );
    }

    if let Some(payload) = root.get_mut("payload") {
        if !payload.is_object() {
            let legacy = payload.take();
            *payload = json!({ "linearElements": legacy, "planarElements": [] });
        }
    }

    Ok(document)
}

/// Latest status and log line of a model.
pub fn model_status(store: &dyn StatusStore, name: &str) -> Result<ModelStatus, CatalogError> {
    let record = store
        .latest(name)?
        .ok_or_else(|| CatalogError::NotFound(name.to_string()))?;

    Ok(ModelStatus {
        name: name.to_string(),
        latest_status: record.status,
        latest_log_message: record.log.last().cloned().unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryBlobStore, InMemoryStatusStore, PipelineStatus};
    use crate::tags::TagSet;
    use time::macros::datetime;

    #[test]
    fn test_format_upload_time() {
        assert_eq!(
            format_upload_time(datetime!(2024-03-05 07:08:09 UTC)),
            "2024-03-05 07:08:09"
        );
    }

    #[test]
    fn test_list_models() {
        let store = InMemoryBlobStore::new();
        store
            .put_object("site", "data/tower.json", b"{}".to_vec(), &TagSet::from_query("units=metric"))
            .unwrap();
        store.put_object("site", "data/", vec![], &TagSet::new()).unwrap();

        let models = list_models(&store, "site", "data").unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].model, "tower");
        assert_eq!(models[0].s3_attributes["units"], json!("metric"));
        assert!(models[0].s3_attributes.contains_key("uploadTime"));
    }

    #[test]
    fn test_model_data_wraps_legacy_payload() {
        let store = InMemoryBlobStore::new();
        let body = json!({"modelInformation": {"name": "old"}, "payload": [{"vertices": [[0, 0, 0]]}]});
        store
            .put_object("site", "data/old.json", serde_json::to_vec(&body).unwrap(), &TagSet::new())
            .unwrap();

        let doc = model_data(&store, "site", "data", "old").unwrap();
        assert_eq!(doc["payload"]["planarElements"], json!([]));
        assert_eq!(doc["payload"]["linearElements"][0]["vertices"], json!([[0, 0, 0]]));
        assert!(doc["modelInformation"]["s3_attributes"]["uploadTime"].is_string());
    }

    #[test]
    fn test_model_data_not_found() {
        let store = InMemoryBlobStore::new();
        assert!(matches!(
            model_data(&store, "site", "data", "ghost"),
            Err(CatalogError::NotFound(name)) if name == "ghost"
        ));
    }

    #[test]
    fn test_model_status() {
        let store = InMemoryStatusStore::new();
        store.record("tower", &PipelineStatus::Received, "fetched").unwrap();
        store.record("tower", &PipelineStatus::Complete, "written").unwrap();

        let status = model_status(&store, "tower").unwrap();
        assert_eq!(status.latest_status, "complete");
        assert_eq!(status.latest_log_message, "written");
        assert!(matches!(model_status(&store, "ghost"), Err(CatalogError::NotFound(_))));
    }
}
