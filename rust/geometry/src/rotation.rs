// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rotation fallback for loops whose horizontal projection collapses
//!
//! A wall lies in a vertical plane, so its XY projection is a line. Rotating
//! the loop about a horizontal axis lying in (or parallel to) the wall brings
//! it down onto the horizontal plane, where the regular triangulation works.
//! Only a rotated copy is triangulated. It has the same point order as the
//! input, so triangle indices refer to the original points unchanged.

use crate::closure::ring_len;
use crate::error::TessellationWarning;
use crate::options::{AxisStrategy, ClosureTolerance, TessellationOptions};
use crate::triangulation::{calculate_polygon_normal, tessellate_horizontal};
use crate::{Point3, Vector3};
use nalgebra::{Rotation3, Unit};
use std::f64::consts::FRAC_PI_2;

/// Rotation applied to a degenerate loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopRotation {
    pub axis: Unit<Vector3<f64>>,
    pub angle: f64,
}

impl LoopRotation {
    /// Quarter turn about `axis`
    pub fn quarter_turn(axis: Unit<Vector3<f64>>) -> Self {
        Self {
            axis,
            angle: FRAC_PI_2,
        }
    }

    /// Rotate every point about the origin, returning new points in the same order
    pub fn apply(&self, points: &[Point3<f64>]) -> Vec<Point3<f64>> {
        let rotation = Rotation3::from_axis_angle(&self.axis, self.angle);
        points.iter().map(|p| rotation * p).collect()
    }
}

/// Triangles of a rotated loop together with the rotation that produced them
#[derive(Debug, Clone, PartialEq)]
pub struct RotatedTessellation {
    pub rotation: LoopRotation,
    pub indices: Vec<usize>,
}

/// Find the first difference vector between two loop points that has a zero
/// Z component.
///
/// Every point is tried as the reference in loop order and paired with every
/// other point in loop order. The closing duplicate takes no part, and
/// coincident points are skipped since their difference has no direction.
/// The result depends on point order and is not guaranteed to lie in the
/// polygon's plane for irregular loops.
pub fn find_rotation_axis(
    closed: &[Point3<f64>],
    tolerance: ClosureTolerance,
) -> Option<Unit<Vector3<f64>>> {
    let ring = &closed[..ring_len(closed, tolerance)];

    for (i, reference) in ring.iter().enumerate() {
        for (j, other) in ring.iter().enumerate() {
            if i == j {
                continue;
            }
            let diff = other - reference;
            if diff.z == 0.0 && diff.norm_squared() > 0.0 {
                return Some(Unit::new_normalize(diff));
            }
        }
    }

    None
}

/// Rotation that takes the loop's plane onto the horizontal plane, derived
/// from the polygon normal instead of a point pair
pub fn plane_rotation(closed: &[Point3<f64>], tolerance: ClosureTolerance) -> Option<LoopRotation> {
    let ring = &closed[..ring_len(closed, tolerance)];
    if ring.len() < 3 {
        return None;
    }

    let normal = calculate_polygon_normal(ring);
    let up = Vector3::z();
    let axis = normal.cross(&up);
    if axis.norm() <= 1e-10 {
        // Normal already vertical
        return None;
    }

    Some(LoopRotation {
        axis: Unit::new_normalize(axis),
        angle: normal.angle(&up),
    })
}

/// Rotate a degenerate loop and triangulate the rotated copy.
///
/// Triangle indices refer to positions in `closed`, which are the same
/// positions as in the unrotated input.
pub fn tessellate_rotated(
    closed: &[Point3<f64>],
    options: &TessellationOptions,
) -> Result<RotatedTessellation, TessellationWarning> {
    let rotation = match options.axis_strategy {
        AxisStrategy::FirstHorizontalEdge => {
            find_rotation_axis(closed, options.closure).map(LoopRotation::quarter_turn)
        }
        AxisStrategy::PlaneNormal => plane_rotation(closed, options.closure),
    }
    .ok_or(TessellationWarning::NoHorizontalAxis)?;

    let rotated = rotation.apply(closed);
    let indices = tessellate_horizontal(&rotated, options)
        .map_err(|e| TessellationWarning::TriangulationFailed(e.to_string()))?;

    if indices.is_empty() {
        let axis = rotation.axis.into_inner();
        return Err(TessellationWarning::StillDegenerate {
            x: axis.x,
            y: axis.y,
            z: axis.z,
        });
    }

    Ok(RotatedTessellation { rotation, indices })
}
