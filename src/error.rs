// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error kinds shared by the pipeline stages

use std::path::PathBuf;
use thiserror::Error;

/// Result type for stage operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Failures while opening or reading an elevation raster
#[derive(Error, Debug)]
pub enum RasterError {
    #[error("Failed to open raster {path}: {details}")]
    Open { path: PathBuf, details: String },

    #[error("Raster {0} carries no affine geotransform")]
    MissingGeoTransform(PathBuf),

    #[error("Invalid geotransform matrix (determinant is zero)")]
    InvalidGeotransform,

    #[error("Unsupported raster layout: {0}")]
    UnsupportedLayout(String),

    #[error("Failed to read raster cell ({col}, {row})")]
    Read { col: i64, row: i64 },
}

/// Failures of a single point-elevation query
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SampleError {
    #[error("Invalid geotransform matrix")]
    InvalidGeotransform,

    #[error("Coordinates ({x:.6}, {y:.6}) are outside DTM bounds")]
    OutOfBounds { x: f64, y: f64 },

    #[error("No elevation data available at coordinates ({x:.6}, {y:.6})")]
    NoData { x: f64, y: f64 },

    #[error("Failed to read elevation data: {0}")]
    Read(String),
}

/// Geometry problems that make one mesh unusable
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("no valid vertices found")]
    NoVertices,

    #[error("no valid faces found")]
    NoFaces,

    #[error("no bottom vertices found")]
    NoBottomVertices,

    #[error("could not get DTM elevation for any bottom vertices")]
    NoValidSamples,
}

/// Errors raised by the pipeline stages
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Cannot access {path}: {source}")]
    Access {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{file}:{line}: {message}")]
    Parse {
        file: String,
        line: usize,
        message: String,
    },

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Raster(#[from] RasterError),

    #[error("{0} does not appear to be a CityGML file")]
    Validation(String),

    #[error("{0}")]
    EmptyResult(String),

    #[error("Failed to serialize report: {0}")]
    Report(#[from] serde_json::Error),
}

impl PipelineError {
    pub fn access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Access {
            path: path.into(),
            source,
        }
    }
}
