// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tessellation options

use std::str::FromStr;

/// Default area below which a projected polygon counts as degenerate
pub const DEFAULT_AREA_EPSILON: f64 = 1e-10;

/// How the first and last point of a loop are compared when deciding
/// whether the loop is already closed
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ClosureTolerance {
    /// Bit-exact coordinate comparison
    #[default]
    Exact,
    /// Per-coordinate comparison with an absolute tolerance
    Epsilon(f64),
}

impl ClosureTolerance {
    /// Build from an optional epsilon; `None` or a non-positive value means exact
    pub fn from_epsilon(epsilon: Option<f64>) -> Self {
        match epsilon {
            Some(e) if e > 0.0 => ClosureTolerance::Epsilon(e),
            _ => ClosureTolerance::Exact,
        }
    }

    #[inline]
    pub(crate) fn coords_equal(&self, a: f64, b: f64) -> bool {
        match *self {
            ClosureTolerance::Exact => a == b,
            ClosureTolerance::Epsilon(e) => (a - b).abs() <= e,
        }
    }
}

/// How the rotation fallback picks the axis it rotates a degenerate loop about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisStrategy {
    /// First difference vector between two loop points with a zero Z component,
    /// rotated by a quarter turn
    #[default]
    FirstHorizontalEdge,
    /// Axis perpendicular to both the polygon normal and +Z, rotated by the
    /// angle that brings the polygon plane onto the horizontal plane
    PlaneNormal,
}

impl FromStr for AxisStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "first_horizontal_edge" | "edge" => Ok(AxisStrategy::FirstHorizontalEdge),
            "plane_normal" | "normal" => Ok(AxisStrategy::PlaneNormal),
            other => Err(format!("unknown axis strategy '{}'", other)),
        }
    }
}

/// Options controlling a single element tessellation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TessellationOptions {
    /// Loop closure comparison
    pub closure: ClosureTolerance,
    /// Projected area at or below which the XY projection is degenerate
    pub area_epsilon: f64,
    /// Rotation axis selection for the fallback pass
    pub axis_strategy: AxisStrategy,
}

impl Default for TessellationOptions {
    fn default() -> Self {
        Self {
            closure: ClosureTolerance::Exact,
            area_epsilon: DEFAULT_AREA_EPSILON,
            axis_strategy: AxisStrategy::FirstHorizontalEdge,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tolerance_from_epsilon() {
        assert_eq!(ClosureTolerance::from_epsilon(None), ClosureTolerance::Exact);
        assert_eq!(ClosureTolerance::from_epsilon(Some(0.0)), ClosureTolerance::Exact);
        assert_eq!(
            ClosureTolerance::from_epsilon(Some(1e-6)),
            ClosureTolerance::Epsilon(1e-6)
        );
    }

    #[test]
    fn test_axis_strategy_parse() {
        assert_eq!(
            "first-horizontal-edge".parse::<AxisStrategy>().unwrap(),
            AxisStrategy::FirstHorizontalEdge
        );
        assert_eq!("Plane_Normal".parse::<AxisStrategy>().unwrap(), AxisStrategy::PlaneNormal);
        assert!("diagonal".parse::<AxisStrategy>().is_err());
    }
}
