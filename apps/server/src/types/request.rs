// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Request types for the API.

use serde::Deserialize;

/// Notification that an object was written to a bucket.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectCreatedEvent {
    pub bucket: String,
    /// Object key as delivered by the store (`+` for spaces, percent-encoded).
    pub key: String,
}
