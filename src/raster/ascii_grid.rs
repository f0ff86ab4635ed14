// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! ESRI ASCII grid (`.asc`) reader

use super::{GeoTransform, GridSource};
use crate::error::RasterError;
use std::fs;
use std::path::Path;

#[derive(Debug, Default)]
struct Header {
    ncols: Option<usize>,
    nrows: Option<usize>,
    xll: Option<f64>,
    yll: Option<f64>,
    centered: bool,
    cellsize: Option<f64>,
    nodata: Option<f64>,
}

pub fn open(path: &Path) -> Result<GridSource, RasterError> {
    let text = fs::read_to_string(path).map_err(|e| RasterError::Open {
        path: path.to_path_buf(),
        details: e.to_string(),
    })?;
    parse(&text, path)
}

pub(super) fn parse(text: &str, path: &Path) -> Result<GridSource, RasterError> {
    let bad = |details: String| RasterError::Open {
        path: path.to_path_buf(),
        details,
    };

    let mut header = Header::default();
    let mut values = Vec::new();
    let mut in_header = true;

    for line in text.lines() {
        let mut parts = line.split_whitespace();
        let Some(first) = parts.next() else {
            continue;
        };

        if in_header && first.parse::<f64>().is_err() {
            let value = parts
                .next()
                .ok_or_else(|| bad(format!("header key '{}' has no value", first)))?;
            let number = |v: &str| {
                v.parse::<f64>()
                    .map_err(|_| bad(format!("invalid value '{}' for '{}'", v, first)))
            };
            let count = |v: &str| match v.parse::<usize>() {
                Ok(n) if n > 0 => Ok(n),
                _ => Err(bad(format!("'{}' needs a positive integer, got '{}'", first, v))),
            };
            match first.to_lowercase().as_str() {
                "ncols" => header.ncols = Some(count(value)?),
                "nrows" => header.nrows = Some(count(value)?),
                "xllcorner" => header.xll = Some(number(value)?),
                "yllcorner" => header.yll = Some(number(value)?),
                "xllcenter" => {
                    header.xll = Some(number(value)?);
                    header.centered = true;
                }
                "yllcenter" => {
                    header.yll = Some(number(value)?);
                    header.centered = true;
                }
                "cellsize" => header.cellsize = Some(number(value)?),
                "nodata_value" => header.nodata = Some(number(value)?),
                _ => {}
            }
            continue;
        }

        in_header = false;
        for token in std::iter::once(first).chain(parts) {
            let v = token
                .parse::<f64>()
                .map_err(|_| bad(format!("invalid cell value '{}'", token)))?;
            values.push(v);
        }
    }

    let (Some(ncols), Some(nrows)) = (header.ncols, header.nrows) else {
        return Err(RasterError::UnsupportedLayout(
            "ASCII grid header lacks ncols/nrows".to_string(),
        ));
    };
    let (Some(xll), Some(yll), Some(cellsize)) = (header.xll, header.yll, header.cellsize) else {
        return Err(RasterError::MissingGeoTransform(path.to_path_buf()));
    };

    // Lower-left centre references sit half a cell inside the grid edge
    let (left, bottom) = if header.centered {
        (xll - cellsize / 2.0, yll - cellsize / 2.0)
    } else {
        (xll, yll)
    };
    let top = bottom + nrows as f64 * cellsize;
    let transform = GeoTransform::north_up(left, top, cellsize, cellsize);

    let grid = GridSource::new(ncols, nrows, values, transform)?;
    Ok(match header.nodata {
        Some(nodata) => grid.with_nodata(nodata),
        None => grid,
    })
}
