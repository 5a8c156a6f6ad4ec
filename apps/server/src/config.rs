// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Server configuration loaded from environment variables.

use facegen_geometry::{AxisStrategy, ClosureTolerance, TessellationOptions, DEFAULT_AREA_EPSILON};
use facegen_processing::UploadSettings;

/// Server configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Port to listen on.
    pub port: u16,
    /// Bucket models are served from.
    pub site_bucket: String,
    /// Bucket uploads wait in until their faces are generated.
    pub staging_bucket: String,
    /// Key prefix for model documents.
    pub data_folder: String,
    /// Number of worker threads for parallel processing.
    pub worker_threads: usize,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Maximum request body size in MB.
    pub max_body_size_mb: usize,
    /// Tolerance for loop closure; exact comparison when unset.
    pub closure_epsilon: Option<f64>,
    /// Projected area below which a loop counts as degenerate.
    pub area_epsilon: f64,
    /// Axis selection for the rotation fallback.
    pub axis_strategy: AxisStrategy,
    /// Tessellate the elements of a document in parallel.
    pub parallel_elements: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from any variable source.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            port: var("PORT").and_then(|v| v.parse().ok()).unwrap_or(8080),
            site_bucket: var("SITE_BUCKET").unwrap_or_else(|| "model-viewer-site".into()),
            staging_bucket: var("STAGING_BUCKET").unwrap_or_else(|| "model-viewer-faces-staging".into()),
            data_folder: var("DATA_FOLDER")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|| "data".into()),
            worker_threads: var("WORKER_THREADS")
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(num_cpus::get),
            request_timeout_secs: var("REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            max_body_size_mb: var("MAX_BODY_SIZE_MB")
                .and_then(|v| v.parse().ok())
                .unwrap_or(64),
            closure_epsilon: var("CLOSURE_EPSILON").and_then(|v| v.parse().ok()),
            area_epsilon: var("AREA_EPSILON")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_AREA_EPSILON),
            axis_strategy: var("AXIS_STRATEGY")
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            parallel_elements: var("PARALLEL_ELEMENTS")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        }
    }

    /// Tessellation options derived from this configuration.
    pub fn tessellation_options(&self) -> TessellationOptions {
        TessellationOptions {
            closure: ClosureTolerance::from_epsilon(self.closure_epsilon),
            area_epsilon: self.area_epsilon,
            axis_strategy: self.axis_strategy,
        }
    }

    /// Where uploads are stored.
    pub fn upload_settings(&self) -> UploadSettings {
        UploadSettings {
            site_bucket: self.site_bucket.clone(),
            staging_bucket: self.staging_bucket.clone(),
            data_folder: self.data_folder.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_folder, "data");
        assert_eq!(config.closure_epsilon, None);
        assert_eq!(config.tessellation_options(), TessellationOptions::default());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("PORT", "9000"),
            ("DATA_FOLDER", "models/"),
            ("CLOSURE_EPSILON", "0.001"),
            ("AXIS_STRATEGY", "plane-normal"),
            ("PARALLEL_ELEMENTS", "true"),
            ("WORKER_THREADS", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let config = Config::from_lookup(|name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(config.port, 9000);
        assert_eq!(config.data_folder, "models");
        assert_eq!(config.worker_threads, num_cpus::get());
        assert!(config.parallel_elements);

        let options = config.tessellation_options();
        assert_eq!(options.closure, ClosureTolerance::Epsilon(0.001));
        assert_eq!(options.axis_strategy, AxisStrategy::PlaneNormal);
        assert_eq!(config.upload_settings().data_folder, "models");
    }
}
