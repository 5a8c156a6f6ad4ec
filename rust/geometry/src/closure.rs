// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vertex loop closure

use crate::options::ClosureTolerance;
use crate::Point3;

/// Check whether the first and last point of a loop coincide.
/// An empty loop is not closed.
#[inline]
pub fn is_closed(points: &[Point3<f64>], tolerance: ClosureTolerance) -> bool {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) => {
            tolerance.coords_equal(first.x, last.x)
                && tolerance.coords_equal(first.y, last.y)
                && tolerance.coords_equal(first.z, last.z)
        }
        _ => false,
    }
}

/// Return the loop with its first point repeated at the end.
///
/// Empty loops and loops that are already closed come back unchanged.
pub fn close_loop(points: &[Point3<f64>], tolerance: ClosureTolerance) -> Vec<Point3<f64>> {
    if points.is_empty() || is_closed(points, tolerance) {
        return points.to_vec();
    }

    let mut closed = Vec::with_capacity(points.len() + 1);
    closed.extend_from_slice(points);
    closed.push(points[0]);
    closed
}

/// Length of the ring without its closing duplicate
#[inline]
pub(crate) fn ring_len(closed: &[Point3<f64>], tolerance: ClosureTolerance) -> usize {
    if closed.len() > 1 && is_closed(closed, tolerance) {
        closed.len() - 1
    } else {
        closed.len()
    }
}
