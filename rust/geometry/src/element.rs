// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tessellation of a single planar element
//!
//! The loop is closed and triangulated in its horizontal projection. When that
//! projection is degenerate a rotated copy is triangulated instead. Faces are
//! emitted against the caller's original vertex list.

use crate::closure::{close_loop, ring_len};
use crate::error::TessellationWarning;
use crate::faces::{emit_faces, Face};
use crate::options::TessellationOptions;
use crate::rotation::tessellate_rotated;
use crate::triangulation::tessellate_horizontal;
use crate::Point3;

/// Which pass produced an element's faces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TessellationPath {
    /// No vertices, nothing to do
    Empty,
    /// Horizontal projection triangulated directly
    Primary,
    /// Triangulated after rotating the loop
    RotationFallback,
    /// Both passes came back empty
    Failed,
}

/// Faces of one element and how they were obtained
#[derive(Debug, Clone, PartialEq)]
pub struct ElementTessellation {
    pub faces: Vec<Face>,
    pub path: TessellationPath,
    /// Set when a non-empty loop produced no faces
    pub warning: Option<TessellationWarning>,
}

impl ElementTessellation {
    fn empty() -> Self {
        Self {
            faces: Vec::new(),
            path: TessellationPath::Empty,
            warning: None,
        }
    }

    fn failed(warning: TessellationWarning) -> Self {
        Self {
            faces: Vec::new(),
            path: TessellationPath::Failed,
            warning: Some(warning),
        }
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }
}

/// Tessellate one element's vertex loop.
///
/// Face indices refer to `vertices` as given; the closing point added during
/// normalization never shows up in the output.
pub fn tessellate_element(
    vertices: &[Point3<f64>],
    options: &TessellationOptions,
) -> ElementTessellation {
    if vertices.is_empty() {
        return ElementTessellation::empty();
    }

    let closed = close_loop(vertices, options.closure);

    let primary = match tessellate_horizontal(&closed, options) {
        Ok(indices) => indices,
        Err(e) => {
            return ElementTessellation::failed(TessellationWarning::TriangulationFailed(
                e.to_string(),
            ))
        }
    };

    if !primary.is_empty() {
        return ElementTessellation {
            faces: emit_faces(&primary, vertices.len()),
            path: TessellationPath::Primary,
            warning: None,
        };
    }

    if closed.len() < 3 {
        return ElementTessellation::failed(TessellationWarning::TooFewPoints(ring_len(
            &closed,
            options.closure,
        )));
    }

    match tessellate_rotated(&closed, options) {
        Ok(rotated) => ElementTessellation {
            faces: emit_faces(&rotated.indices, vertices.len()),
            path: TessellationPath::RotationFallback,
            warning: None,
        },
        Err(warning) => ElementTessellation::failed(warning),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_loop() {
        let result = tessellate_element(&[], &TessellationOptions::default());
        assert!(result.faces.is_empty());
        assert_eq!(result.path, TessellationPath::Empty);
        assert!(result.warning.is_none());
    }

    #[test]
    fn test_single_point_warns() {
        let result = tessellate_element(&[Point3::new(1.0, 2.0, 3.0)], &TessellationOptions::default());
        assert!(result.faces.is_empty());
        assert_eq!(result.path, TessellationPath::Failed);
        assert_eq!(result.warning, Some(TessellationWarning::TooFewPoints(1)));
        assert_eq!(
            result.warning.unwrap().to_string(),
            "loop has 1 point(s), at least 3 are needed"
        );
    }

    #[test]
    fn test_primary_path() {
        let vertices = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(4.0, 0.0, 0.0),
            Point3::new(0.0, 3.0, 0.0),
        ];
        let result = tessellate_element(&vertices, &TessellationOptions::default());
        assert_eq!(result.path, TessellationPath::Primary);
        assert_eq!(result.faces, vec![[0, 1, 2]]);
    }

    #[test]
    fn test_fallback_path() {
        let vertices = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        let result = tessellate_element(&vertices, &TessellationOptions::default());
        assert_eq!(result.path, TessellationPath::RotationFallback);
        assert_eq!(result.triangle_count(), 2);
        assert!(result.warning.is_none());
    }

    #[test]
    fn test_already_closed_input_keeps_indices_in_range() {
        let vertices = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
        ];
        let result = tessellate_element(&vertices, &TessellationOptions::default());
        assert_eq!(result.triangle_count(), 2);
        assert!(result.faces.iter().flatten().all(|&i| (i as usize) < vertices.len()));
    }
}
