// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Small numeric helpers

use nalgebra::{Point3, Vector3};

/// Unit normal of the plane through three points, right-handed.
/// Collinear or coincident points give +Z.
pub fn polygon_normal(p0: &Point3<f64>, p1: &Point3<f64>, p2: &Point3<f64>) -> Vector3<f64> {
    (p1 - p0)
        .cross(&(p2 - p0))
        .try_normalize(0.0)
        .unwrap_or_else(Vector3::z)
}

/// `a` at `t = 0`, `b` at `t = 1`
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// Share of `original` removed to get down to `reduced`, in percent
pub fn reduction_percent(original: usize, reduced: usize) -> f64 {
    if original == 0 {
        return 0.0;
    }
    (original as f64 - reduced as f64) / original as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lerp_weights_endpoints() {
        assert_eq!(lerp(10.0, 12.0, 0.0), 10.0);
        assert_eq!(lerp(10.0, 12.0, 1.0), 12.0);
        assert_relative_eq!(lerp(14.0, 16.0, 0.25), 14.5);
    }

    #[test]
    fn test_polygon_normal() {
        let n = polygon_normal(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 1.0),
        );
        assert_relative_eq!(n, Vector3::new(0.0, -1.0, 0.0));

        let flat = Point3::new(3.0, 3.0, 3.0);
        assert_eq!(polygon_normal(&flat, &flat, &flat), Vector3::z());
    }

    #[test]
    fn test_reduction_percent() {
        assert_eq!(reduction_percent(0, 0), 0.0);
        assert_eq!(reduction_percent(8, 4), 50.0);
        assert_eq!(reduction_percent(10, 10), 0.0);
    }
}
