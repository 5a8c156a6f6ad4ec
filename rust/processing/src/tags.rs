// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Object tag sets and their `key=value&key=value` form.

use serde_json::{Map, Value};

/// Tag carrying the bucket a tessellated document is written to
pub const DESTINATION_TAG: &str = "destination";

/// Ordered set of object tags. Keys are unique; insertion order is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    tags: Vec<(String, String)>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `k=v&k2=v2`. Empty segments are skipped; a segment without `=`
    /// becomes a key with an empty value.
    pub fn from_query(query: &str) -> Self {
        let mut set = Self::new();
        for segment in query.split('&').filter(|s| !s.is_empty()) {
            let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
            set.insert(key, value);
        }
        set
    }

    /// Tags built from the entries of a JSON object. String values are used
    /// as-is, anything else in its JSON form.
    pub fn from_json_object(object: &Map<String, Value>) -> Self {
        let mut set = Self::new();
        for (key, value) in object {
            match value {
                Value::String(s) => set.insert(key, s),
                other => set.insert(key, &other.to_string()),
            }
        }
        set
    }

    /// Format as `k=v&k2=v2`; an empty set gives an empty string.
    pub fn to_query(&self) -> String {
        self.tags
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Insert or replace a tag, keeping the position of an existing key
    pub fn insert(&mut self, key: &str, value: &str) {
        match self.tags.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.tags.push((key.to_string(), value.to_string())),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Remove a tag and return its value
    pub fn take(&mut self, key: &str) -> Option<String> {
        let pos = self.tags.iter().position(|(k, _)| k == key)?;
        Some(self.tags.remove(pos).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Tags as a JSON object of string values
    pub fn to_json_object(&self) -> Map<String, Value> {
        self.iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TagSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (k, v) in iter {
            set.insert(&k.into(), &v.into());
        }
        set
    }
}
