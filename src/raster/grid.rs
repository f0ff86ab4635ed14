// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! In-memory elevation grid

use super::{GeoTransform, RasterSource};
use crate::error::RasterError;

/// Row-major grid of elevations held in memory
#[derive(Debug, Clone)]
pub struct GridSource {
    width: usize,
    height: usize,
    values: Vec<f64>,
    transform: GeoTransform,
    nodata: Option<f64>,
}

impl GridSource {
    pub fn new(
        width: usize,
        height: usize,
        values: Vec<f64>,
        transform: GeoTransform,
    ) -> Result<Self, RasterError> {
        let cells = width.checked_mul(height).filter(|&n| n > 0);
        if cells != Some(values.len()) {
            return Err(RasterError::UnsupportedLayout(format!(
                "{} values for a {}x{} grid",
                values.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            values,
            transform,
            nodata: None,
        })
    }

    pub fn with_nodata(mut self, nodata: f64) -> Self {
        self.nodata = Some(nodata);
        self
    }
}

impl RasterSource for GridSource {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn geo_transform(&self) -> GeoTransform {
        self.transform
    }

    fn nodata(&self) -> Option<f64> {
        self.nodata
    }

    fn read_cell(&self, col: usize, row: usize) -> Result<f64, RasterError> {
        if col >= self.width || row >= self.height {
            return Err(RasterError::Read {
                col: col as i64,
                row: row as i64,
            });
        }
        Ok(self.values[row * self.width + col])
    }
}
