// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon triangulation utilities
//!
//! Loops are triangulated in their horizontal projection: X and Y are kept,
//! Z is dropped. Wrapper around earcutr for the general case.

use crate::closure::ring_len;
use crate::options::TessellationOptions;
use crate::{Error, Point2, Point3, Result, Vector3};

/// Project a point onto the horizontal (XY) plane
#[inline]
pub fn project_horizontal(point: &Point3<f64>) -> Point2<f64> {
    Point2::new(point.x, point.y)
}

/// Signed area of a 2D ring (shoelace). Positive for counter-clockwise rings.
#[inline]
pub fn signed_area(points: &[Point2<f64>]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }

    let mut twice_area = 0.0;
    for i in 0..n {
        let p0 = &points[i];
        let p1 = &points[(i + 1) % n];
        twice_area += p0.x * p1.y - p1.x * p0.y;
    }
    twice_area * 0.5
}

/// Check if a polygon is convex (all cross products have same sign)
#[inline]
fn is_convex(points: &[Point2<f64>]) -> bool {
    if points.len() < 3 {
        return false;
    }

    let n = points.len();
    let mut sign = 0i8;

    for i in 0..n {
        let p0 = &points[i];
        let p1 = &points[(i + 1) % n];
        let p2 = &points[(i + 2) % n];

        let cross = (p1.x - p0.x) * (p2.y - p1.y) - (p1.y - p0.y) * (p2.x - p1.x);

        if cross.abs() > 1e-10 {
            let current_sign = if cross > 0.0 { 1i8 } else { -1i8 };
            if sign == 0 {
                sign = current_sign;
            } else if sign != current_sign {
                return false;
            }
        }
    }

    true
}

/// Simple fan triangulation for convex polygons
#[inline]
fn fan_triangulate(n: usize) -> Vec<usize> {
    let mut indices = Vec::with_capacity((n - 2) * 3);
    for i in 1..n - 1 {
        indices.push(0);
        indices.push(i);
        indices.push(i + 1);
    }
    indices
}

/// Triangulate a simple polygon (no holes)
/// Returns triangle indices into the input points
pub fn triangulate_polygon(points: &[Point2<f64>]) -> Result<Vec<usize>> {
    let n = points.len();

    if n < 3 {
        return Err(Error::TriangulationError(
            "Need at least 3 points to triangulate".to_string(),
        ));
    }

    // FAST PATH: Triangle
    if n == 3 {
        return Ok(vec![0, 1, 2]);
    }

    // FAST PATH: Convex polygon - fan from the first point
    if n <= 8 && is_convex(points) {
        return Ok(fan_triangulate(n));
    }

    let mut vertices = Vec::with_capacity(n * 2);
    for p in points {
        vertices.push(p.x);
        vertices.push(p.y);
    }

    earcutr::earcut(&vertices, &[], 2).map_err(|e| Error::TriangulationError(format!("{:?}", e)))
}

/// Remove triangles whose area is at most `epsilon`, such as the ones a fan
/// builds across a repeated vertex
fn drop_degenerate_triangles(
    points: &[Point2<f64>],
    indices: Vec<usize>,
    epsilon: f64,
) -> Vec<usize> {
    indices
        .chunks_exact(3)
        .filter(|t| signed_area(&[points[t[0]], points[t[1]], points[t[2]]]).abs() > epsilon)
        .flatten()
        .copied()
        .collect()
}

/// Triangulate a closed loop in its horizontal projection.
///
/// The closing duplicate is not part of the triangulated ring, so indices stay
/// below the length of the unclosed loop. A projection with fewer than three
/// points or with (near) zero area yields no triangles, and neither does any
/// single triangle of (near) zero area.
pub fn tessellate_horizontal(
    closed: &[Point3<f64>],
    options: &TessellationOptions,
) -> Result<Vec<usize>> {
    let ring = &closed[..ring_len(closed, options.closure)];
    if ring.len() < 3 {
        return Ok(Vec::new());
    }

    let projected: Vec<Point2<f64>> = ring.iter().map(project_horizontal).collect();

    if signed_area(&projected).abs() <= options.area_epsilon {
        return Ok(Vec::new());
    }

    let indices = triangulate_polygon(&projected)?;
    Ok(drop_degenerate_triangles(&projected, indices, options.area_epsilon))
}

/// Calculate the normal of a polygon from its vertices
/// Optimized for triangles and quads using simple cross product
pub fn calculate_polygon_normal(points: &[Point3<f64>]) -> Vector3<f64> {
    let n = points.len();

    if n < 3 {
        return Vector3::new(0.0, 0.0, 1.0);
    }

    // FAST PATH: Triangle or quad
    if n <= 4 {
        let v1 = points[1] - points[0];
        let v2 = points[2] - points[0];
        let normal = v1.cross(&v2);
        let len = normal.norm();
        if len > 1e-10 {
            return normal / len;
        }
        if n == 4 {
            let v3 = points[3] - points[0];
            let normal = v2.cross(&v3);
            let len = normal.norm();
            if len > 1e-10 {
                return normal / len;
            }
        }
        return Vector3::new(0.0, 0.0, 1.0);
    }

    // Newell's method for everything larger
    let mut normal = Vector3::<f64>::zeros();

    for i in 0..n {
        let current = &points[i];
        let next = &points[(i + 1) % n];

        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }

    let len = normal.norm();
    if len > 1e-10 {
        normal / len
    } else {
        Vector3::new(0.0, 0.0, 1.0)
    }
}
