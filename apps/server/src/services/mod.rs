// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Service modules for face generation and model storage.

pub mod processor;

pub use processor::{tessellate_value, upload_stamp};
