// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during geometry processing
#[derive(Error, Debug)]
pub enum Error {
    #[error("Triangulation failed: {0}")]
    TriangulationError(String),
}

/// Reasons an element came out of tessellation without any faces.
///
/// These are not errors: the element is kept with an empty face list.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TessellationWarning {
    #[error("loop has {0} point(s), at least 3 are needed")]
    TooFewPoints(usize),

    #[error("no pair of loop points differs only horizontally, cannot pick a rotation axis")]
    NoHorizontalAxis,

    #[error("loop is still degenerate after rotating about ({x:.6}, {y:.6}, {z:.6})")]
    StillDegenerate { x: f64, y: f64, z: f64 },

    #[error("triangulation failed: {0}")]
    TriangulationFailed(String),
}
