// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Storage collaborators: a blob store for documents and their tags, and a
//! status store for pipeline progress.

use crate::error::UpstreamError;
use crate::tags::TagSet;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::fmt;
use std::sync::RwLock;
use time::OffsetDateTime;

/// Listing entry for a stored object
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSummary {
    pub key: String,
    pub size: usize,
    pub last_modified: OffsetDateTime,
}

/// Bucket/key object storage with per-object tags.
pub trait BlobStore: Send + Sync {
    fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, UpstreamError>;

    fn get_object_tagging(&self, bucket: &str, key: &str) -> Result<TagSet, UpstreamError>;

    fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectSummary, UpstreamError>;

    /// Create or overwrite an object together with its tags
    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        tags: &TagSet,
    ) -> Result<(), UpstreamError>;

    /// Objects whose key starts with `prefix`, ordered by key
    fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectSummary>, UpstreamError>;
}

/// Pipeline state of a model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineStatus {
    Received,
    Processing,
    Complete,
    Error(String),
}

impl fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStatus::Received => write!(f, "received"),
            PipelineStatus::Processing => write!(f, "processing"),
            PipelineStatus::Complete => write!(f, "complete"),
            PipelineStatus::Error(message) => write!(f, "error: {}", message),
        }
    }
}

/// Latest status of a model and its log so far
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRecord {
    pub name: String,
    pub status: String,
    pub log: Vec<String>,
}

/// Append-only status log keyed by model name.
pub trait StatusStore: Send + Sync {
    fn record(&self, name: &str, status: &PipelineStatus, message: &str) -> Result<(), UpstreamError>;

    fn latest(&self, name: &str) -> Result<Option<StatusRecord>, UpstreamError>;
}

#[derive(Debug, Clone)]
struct StoredObject {
    body: Vec<u8>,
    tags: TagSet,
    last_modified: OffsetDateTime,
}

/// Blob store kept in memory
#[derive(Debug, Default)]
pub struct InMemoryBlobStore {
    objects: RwLock<FxHashMap<(String, String), StoredObject>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_object<T>(
        &self,
        bucket: &str,
        key: &str,
        f: impl FnOnce(&StoredObject) -> T,
    ) -> Result<T, UpstreamError> {
        let objects = self
            .objects
            .read()
            .map_err(|_| UpstreamError::LockPoisoned("blob store"))?;
        objects
            .get(&(bucket.to_string(), key.to_string()))
            .map(f)
            .ok_or_else(|| UpstreamError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }
}

impl BlobStore for InMemoryBlobStore {
    fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, UpstreamError> {
        self.with_object(bucket, key, |o| o.body.clone())
    }

    fn get_object_tagging(&self, bucket: &str, key: &str) -> Result<TagSet, UpstreamError> {
        self.with_object(bucket, key, |o| o.tags.clone())
    }

    fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectSummary, UpstreamError> {
        self.with_object(bucket, key, |o| ObjectSummary {
            key: key.to_string(),
            size: o.body.len(),
            last_modified: o.last_modified,
        })
    }

    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        tags: &TagSet,
    ) -> Result<(), UpstreamError> {
        let mut objects = self
            .objects
            .write()
            .map_err(|_| UpstreamError::LockPoisoned("blob store"))?;
        tracing::debug!(bucket = %bucket, key = %key, size = body.len(), "Stored object");
        objects.insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body,
                tags: tags.clone(),
                last_modified: OffsetDateTime::now_utc(),
            },
        );
        Ok(())
    }

    fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectSummary>, UpstreamError> {
        let objects = self
            .objects
            .read()
            .map_err(|_| UpstreamError::LockPoisoned("blob store"))?;
        let mut listed: Vec<ObjectSummary> = objects
            .iter()
            .filter(|((b, k), _)| b == bucket && k.starts_with(prefix))
            .map(|((_, k), o)| ObjectSummary {
                key: k.clone(),
                size: o.body.len(),
                last_modified: o.last_modified,
            })
            .collect();
        listed.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(listed)
    }
}

/// Status store kept in memory
#[derive(Debug, Default)]
pub struct InMemoryStatusStore {
    records: RwLock<FxHashMap<String, StatusRecord>>,
}

impl InMemoryStatusStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatusStore for InMemoryStatusStore {
    fn record(&self, name: &str, status: &PipelineStatus, message: &str) -> Result<(), UpstreamError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| UpstreamError::LockPoisoned("status store"))?;
        let record = records.entry(name.to_string()).or_insert_with(|| StatusRecord {
            name: name.to_string(),
            status: String::new(),
            log: Vec::new(),
        });
        record.status = status.to_string();
        record.log.push(message.to_string());
        Ok(())
    }

    fn latest(&self, name: &str) -> Result<Option<StatusRecord>, UpstreamError> {
        let records = self
            .records
            .read()
            .map_err(|_| UpstreamError::LockPoisoned("status store"))?;
        Ok(records.get(name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_round_trip() {
        let store = InMemoryBlobStore::new();
        let tags = TagSet::from_query("units=metric");
        store.put_object("site", "data/a.json", b"{}".to_vec(), &tags).unwrap();

        assert_eq!(store.get_object("site", "data/a.json").unwrap(), b"{}".to_vec());
        assert_eq!(store.get_object_tagging("site", "data/a.json").unwrap(), tags);
        assert_eq!(store.head_object("site", "data/a.json").unwrap().size, 2);
    }

    #[test]
    fn test_missing_object() {
        let store = InMemoryBlobStore::new();
        assert_eq!(
            store.get_object("site", "nope").unwrap_err(),
            UpstreamError::NotFound {
                bucket: "site".into(),
                key: "nope".into()
            }
        );
    }

    #[test]
    fn test_list_filters_bucket_and_prefix() {
        let store = InMemoryBlobStore::new();
        let tags = TagSet::new();
        store.put_object("site", "data/b.json", vec![], &tags).unwrap();
        store.put_object("site", "data/a.json", vec![], &tags).unwrap();
        store.put_object("site", "other/c.json", vec![], &tags).unwrap();
        store.put_object("staging", "data/d.json", vec![], &tags).unwrap();

        let keys: Vec<String> = store
            .list_objects("site", "data/")
            .unwrap()
            .into_iter()
            .map(|o| o.key)
            .collect();
        assert_eq!(keys, vec!["data/a.json", "data/b.json"]);
    }

    #[test]
    fn test_status_log_appends() {
        let store = InMemoryStatusStore::new();
        store.record("tower", &PipelineStatus::Received, "fetched").unwrap();
        store
            .record("tower", &PipelineStatus::Error("boom".into()), "failed")
            .unwrap();

        let record = store.latest("tower").unwrap().unwrap();
        assert_eq!(record.status, "error: boom");
        assert_eq!(record.log, vec!["fetched", "failed"]);
        assert!(store.latest("other").unwrap().is_none());
    }
}
