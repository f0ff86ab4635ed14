// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Affine raster geotransform

use crate::error::SampleError;
use serde::{Deserialize, Serialize};

/// Six-coefficient affine mapping between pixel and world coordinates:
/// `[originX, pixelWidth, rotX, originY, rotY, pixelHeight]`.
///
/// `world_x = gt[0] + px * gt[1] + py * gt[2]`
/// `world_y = gt[3] + px * gt[4] + py * gt[5]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform(pub [f64; 6]);

impl GeoTransform {
    /// North-up transform with the origin at the top-left corner
    pub fn north_up(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self([origin_x, pixel_width, 0.0, origin_y, 0.0, -pixel_height])
    }

    pub fn origin(&self) -> (f64, f64) {
        (self.0[0], self.0[3])
    }

    pub fn pixel_size(&self) -> (f64, f64) {
        (self.0[1], self.0[5])
    }

    pub fn determinant(&self) -> f64 {
        self.0[1] * self.0[5] - self.0[2] * self.0[4]
    }

    pub fn is_invertible(&self) -> bool {
        self.determinant() != 0.0
    }

    /// Fractional pixel coordinates of a world point
    pub fn world_to_pixel(&self, x: f64, y: f64) -> Result<(f64, f64), SampleError> {
        let gt = &self.0;
        let det = self.determinant();
        if det == 0.0 {
            return Err(SampleError::InvalidGeotransform);
        }
        let dx = x - gt[0];
        let dy = y - gt[3];
        let px = (dx * gt[5] - dy * gt[2]) / det;
        let py = (dy * gt[1] - dx * gt[4]) / det;
        Ok((px, py))
    }

    pub fn pixel_to_world(&self, px: f64, py: f64) -> (f64, f64) {
        let gt = &self.0;
        (
            gt[0] + px * gt[1] + py * gt[2],
            gt[3] + px * gt[4] + py * gt[5],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_north_up_roundtrip() {
        let gt = GeoTransform::north_up(1000.0, 2000.0, 0.5, 0.5);
        let (px, py) = gt.world_to_pixel(1001.25, 1998.75).unwrap();
        assert_relative_eq!(px, 2.5);
        assert_relative_eq!(py, 2.5);
        let (x, y) = gt.pixel_to_world(px, py);
        assert_relative_eq!(x, 1001.25);
        assert_relative_eq!(y, 1998.75);
    }

    #[test]
    fn test_rotated_inverse() {
        let gt = GeoTransform([10.0, 2.0, 0.5, 20.0, 0.25, -1.5]);
        let (x, y) = gt.pixel_to_world(3.0, 4.0);
        let (px, py) = gt.world_to_pixel(x, y).unwrap();
        assert_relative_eq!(px, 3.0, epsilon = 1e-12);
        assert_relative_eq!(py, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_singular_transform() {
        let gt = GeoTransform([0.0, 1.0, 1.0, 0.0, 1.0, 1.0]);
        assert!(!gt.is_invertible());
        assert_eq!(
            gt.world_to_pixel(0.0, 0.0),
            Err(SampleError::InvalidGeotransform)
        );
    }
}
