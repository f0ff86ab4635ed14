// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Elevation raster access
//!
//! A [`RasterSource`] is anything that can hand out single cells of a
//! georeferenced grid. [`RasterHandle`] owns one source for the length of a
//! stage run and answers point-elevation queries against it, either by
//! nearest neighbour or by bilinear interpolation. Bilinear sampling falls
//! back to the nearest cell near the grid edge or next to nodata cells,
//! preferring a degraded answer over none.

pub mod ascii_grid;
pub mod geotiff;
mod grid;
mod transform;

pub use grid::GridSource;
pub use transform::GeoTransform;

use crate::error::{RasterError, SampleError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Read access to one band of a georeferenced grid
pub trait RasterSource {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn geo_transform(&self) -> GeoTransform;
    fn nodata(&self) -> Option<f64>;
    fn read_cell(&self, col: usize, row: usize) -> Result<f64, RasterError>;
}

/// Point sampling strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleMode {
    Nearest,
    #[default]
    Bilinear,
}

/// Exclusively owned elevation raster for one stage run.
///
/// Dropping the handle releases the underlying source.
pub struct RasterHandle {
    source: Box<dyn RasterSource>,
    transform: GeoTransform,
    path: Option<PathBuf>,
}

impl std::fmt::Debug for RasterHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterHandle")
            .field("path", &self.path)
            .field("width", &self.width())
            .field("height", &self.height())
            .field("transform", &self.transform)
            .finish()
    }
}

impl RasterHandle {
    /// Open a raster file, choosing the reader by extension
    pub fn open(path: &Path) -> Result<Self, RasterError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        let source = match ext.as_str() {
            "tif" | "tiff" => geotiff::open(path)?,
            "asc" | "grd" => ascii_grid::open(path)?,
            _ => {
                return Err(RasterError::Open {
                    path: path.to_path_buf(),
                    details: format!("unsupported raster format '{}'", ext),
                })
            }
        };

        let mut handle = Self::from_source(source)?;
        handle.path = Some(path.to_path_buf());
        Ok(handle)
    }

    /// Wrap an already opened source, rejecting non-invertible geotransforms
    pub fn from_source(source: impl RasterSource + 'static) -> Result<Self, RasterError> {
        let transform = source.geo_transform();
        if !transform.is_invertible() {
            return Err(RasterError::InvalidGeotransform);
        }
        Ok(Self {
            source: Box::new(source),
            transform,
            path: None,
        })
    }

    pub fn width(&self) -> usize {
        self.source.width()
    }

    pub fn height(&self) -> usize {
        self.source.height()
    }

    pub fn geo_transform(&self) -> GeoTransform {
        self.transform
    }

    pub fn nodata(&self) -> Option<f64> {
        self.source.nodata()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// One-line summary of the raster for logs
    pub fn describe(&self) -> String {
        let (ox, oy) = self.transform.origin();
        let (pw, ph) = self.transform.pixel_size();
        let mut text = format!(
            "{}x{} pixels, origin ({:.6}, {:.6}), pixel size ({:.6}, {:.6})",
            self.width(),
            self.height(),
            ox,
            oy,
            pw,
            ph
        );
        if let Some(nodata) = self.nodata() {
            text.push_str(&format!(", nodata {:.6}", nodata));
        }
        text
    }

    /// Elevation at world coordinates `(x, y)`
    pub fn elevation_at(&self, x: f64, y: f64, mode: SampleMode) -> Result<f64, SampleError> {
        match mode {
            SampleMode::Nearest => self.nearest(x, y),
            SampleMode::Bilinear => self.bilinear(x, y),
        }
    }

    /// Fractional pixel position; non-finite input lies outside every grid
    fn pixel(&self, x: f64, y: f64) -> Result<(f64, f64), SampleError> {
        let (px, py) = self.transform.world_to_pixel(x, y)?;
        if !px.is_finite() || !py.is_finite() {
            return Err(SampleError::OutOfBounds { x, y });
        }
        Ok((px, py))
    }

    fn nearest(&self, x: f64, y: f64) -> Result<f64, SampleError> {
        let (px, py) = self.pixel(x, y)?;
        let col = px.floor();
        let row = py.floor();

        if col < 0.0 || row < 0.0 || col >= self.width() as f64 || row >= self.height() as f64 {
            return Err(SampleError::OutOfBounds { x, y });
        }

        let value = self.cell(col as usize, row as usize)?;
        if self.is_nodata(value) {
            return Err(SampleError::NoData { x, y });
        }
        Ok(value)
    }

    fn bilinear(&self, x: f64, y: f64) -> Result<f64, SampleError> {
        let (px, py) = self.pixel(x, y)?;
        let x1 = px.floor();
        let y1 = py.floor();

        if x1 < 0.0
            || y1 < 0.0
            || x1 + 1.0 >= self.width() as f64
            || y1 + 1.0 >= self.height() as f64
        {
            return self.nearest(x, y);
        }

        let (c, r) = (x1 as usize, y1 as usize);
        let top_left = self.cell(c, r)?;
        let top_right = self.cell(c + 1, r)?;
        let bottom_left = self.cell(c, r + 1)?;
        let bottom_right = self.cell(c + 1, r + 1)?;

        if [top_left, top_right, bottom_left, bottom_right]
            .iter()
            .any(|&v| self.is_nodata(v))
        {
            return self.nearest(x, y);
        }

        let fx = px - x1;
        let fy = py - y1;
        Ok(bilinear_blend(
            [top_left, top_right, bottom_left, bottom_right],
            fx,
            fy,
        ))
    }

    fn cell(&self, col: usize, row: usize) -> Result<f64, SampleError> {
        self.source
            .read_cell(col, row)
            .map_err(|e| SampleError::Read(e.to_string()))
    }

    fn is_nodata(&self, value: f64) -> bool {
        match self.nodata() {
            Some(nodata) if nodata.is_nan() => value.is_nan(),
            Some(nodata) => value == nodata,
            None => false,
        }
    }
}

/// Interpolate a 2x2 block `[top_left, top_right, bottom_left, bottom_right]`
/// along x for both rows, then along y.
pub fn bilinear_blend(cells: [f64; 4], fx: f64, fy: f64) -> f64 {
    use crate::utils::math::lerp;
    let [top_left, top_right, bottom_left, bottom_right] = cells;
    let top = lerp(top_left, top_right, fx);
    let bottom = lerp(bottom_left, bottom_right, fx);
    lerp(top, bottom, fy)
}
