// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Rigid vertical placement of a mesh on the terrain

use crate::error::{GeometryError, Result};
use crate::geometry::Mesh;
use crate::raster::{RasterHandle, SampleMode};
use log::{debug, warn};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Drape tunables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrapeConfig {
    /// Height band above the lowest vertex that still counts as the base
    pub bottom_tolerance: f64,
    pub sample_mode: SampleMode,
}

impl Default for DrapeConfig {
    fn default() -> Self {
        Self {
            bottom_tolerance: 0.01,
            sample_mode: SampleMode::Bilinear,
        }
    }
}

/// How a mesh was placed on the terrain
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AdjustmentReport {
    pub min_z: f64,
    pub bottom_vertices: usize,
    pub valid_samples: usize,
    /// Mean terrain height under the base vertices
    pub target_elevation: f64,
    /// Shift added to every z
    pub adjustment: f64,
}

/// Work out the z shift that puts the base of the mesh on the mean terrain
/// height beneath it. Failed samples are skipped.
pub fn compute_adjustment(
    vertices: &[Point3<f64>],
    raster: &RasterHandle,
    config: &DrapeConfig,
) -> Result<AdjustmentReport> {
    let min_z = vertices
        .iter()
        .map(|v| v.z)
        .reduce(f64::min)
        .ok_or(GeometryError::NoVertices)?;

    let bottom: Vec<&Point3<f64>> = vertices
        .iter()
        .filter(|v| (v.z - min_z).abs() <= config.bottom_tolerance)
        .collect();
    if bottom.is_empty() {
        return Err(GeometryError::NoBottomVertices.into());
    }

    let mut sum = 0.0;
    let mut valid = 0usize;
    for v in &bottom {
        match raster.elevation_at(v.x, v.y, config.sample_mode) {
            Ok(z) => {
                sum += z;
                valid += 1;
            }
            Err(e) => warn!("Skipping sample at ({:.3}, {:.3}): {}", v.x, v.y, e),
        }
    }
    if valid == 0 {
        return Err(GeometryError::NoValidSamples.into());
    }

    let target_elevation = sum / valid as f64;
    let report = AdjustmentReport {
        min_z,
        bottom_vertices: bottom.len(),
        valid_samples: valid,
        target_elevation,
        adjustment: target_elevation - min_z,
    };
    debug!(
        "minZ {:.3}, {} bottom vertices, {} samples, target {:.3}, adjustment {:.3}",
        report.min_z,
        report.bottom_vertices,
        report.valid_samples,
        report.target_elevation,
        report.adjustment
    );
    Ok(report)
}

/// Shifted copy of `mesh` together with the adjustment that produced it
pub fn elevate(
    mesh: &Mesh,
    raster: &RasterHandle,
    config: &DrapeConfig,
) -> Result<(Mesh, AdjustmentReport)> {
    let report = compute_adjustment(&mesh.vertices, raster, config)?;
    let mut shifted = mesh.clone();
    shifted.translate_z(report.adjustment);
    Ok((shifted, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::geometry::Face;
    use crate::raster::{GeoTransform, GridSource};
    use approx::assert_relative_eq;

    /// 4x4 grid covering (0,0)-(4,4) with constant height
    fn flat(height: f64) -> RasterHandle {
        let gt = GeoTransform::north_up(0.0, 4.0, 1.0, 1.0);
        let grid = GridSource::new(4, 4, vec![height; 16], gt).unwrap();
        RasterHandle::from_source(grid).unwrap()
    }

    fn block(base: f64) -> Mesh {
        Mesh::from_geometry(
            vec![
                Point3::new(1.0, 1.0, base),
                Point3::new(2.0, 1.0, base + 0.005),
                Point3::new(2.0, 2.0, base),
                Point3::new(1.5, 1.5, base + 6.0),
            ],
            vec![Face::new(vec![0, 1, 3]), Face::new(vec![1, 2, 3])],
        )
    }

    #[test]
    fn test_adjustment_moves_base_onto_terrain() {
        let raster = flat(120.0);
        let (shifted, report) = elevate(&block(10.0), &raster, &DrapeConfig::default()).unwrap();

        assert_eq!(report.bottom_vertices, 3);
        assert_eq!(report.valid_samples, 3);
        assert_relative_eq!(report.adjustment, 110.0);
        assert_relative_eq!(shifted.min_z().unwrap(), 120.0);
    }

    #[test]
    fn test_shift_is_rigid() {
        let raster = flat(50.0);
        let original = block(-3.0);
        let (shifted, report) = elevate(&original, &raster, &DrapeConfig::default()).unwrap();

        for (a, b) in original.vertices.iter().zip(&shifted.vertices) {
            assert_eq!(a.x, b.x);
            assert_eq!(a.y, b.y);
            assert_relative_eq!(b.z - a.z, report.adjustment, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_failed_samples_are_skipped() {
        let raster = flat(5.0);
        let mut mesh = block(0.0);
        // Base vertex well outside the raster
        mesh.vertices.push(Point3::new(100.0, 100.0, 0.0));
        let report = compute_adjustment(&mesh.vertices, &raster, &DrapeConfig::default()).unwrap();
        assert_eq!(report.bottom_vertices, 4);
        assert_eq!(report.valid_samples, 3);
        assert_relative_eq!(report.target_elevation, 5.0);
    }

    #[test]
    fn test_no_valid_samples() {
        let raster = flat(5.0);
        let vertices = vec![Point3::new(-50.0, -50.0, 0.0)];
        let err = compute_adjustment(&vertices, &raster, &DrapeConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Geometry(GeometryError::NoValidSamples)
        ));
    }

    #[test]
    fn test_no_vertices() {
        let raster = flat(5.0);
        let err = compute_adjustment(&[], &raster, &DrapeConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Geometry(GeometryError::NoVertices)));
    }

    #[test]
    fn test_negative_tolerance_has_no_bottom() {
        let raster = flat(5.0);
        let config = DrapeConfig {
            bottom_tolerance: -1.0,
            ..DrapeConfig::default()
        };
        let err = compute_adjustment(&block(0.0).vertices, &raster, &config).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Geometry(GeometryError::NoBottomVertices)
        ));
    }
}
