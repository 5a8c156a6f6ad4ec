// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Facegen Geometry
//!
//! Tessellation of planar building elements (walls, floors, slabs) given as
//! vertex loops. Loops are triangulated in their horizontal projection with
//! earcutr; loops standing upright are rotated onto the horizontal plane
//! first, using nalgebra for the rotation.

pub mod closure;
pub mod element;
pub mod error;
pub mod faces;
pub mod options;
pub mod rotation;
pub mod triangulation;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

pub use closure::{close_loop, is_closed};
pub use element::{tessellate_element, ElementTessellation, TessellationPath};
pub use error::{Error, Result, TessellationWarning};
pub use faces::{emit_faces, Face};
pub use options::{AxisStrategy, ClosureTolerance, TessellationOptions, DEFAULT_AREA_EPSILON};
pub use rotation::{find_rotation_axis, tessellate_rotated, LoopRotation, RotatedTessellation};
pub use triangulation::{project_horizontal, tessellate_horizontal, triangulate_polygon};
