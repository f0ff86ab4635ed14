// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Cityforge
//!
//! Building-mesh stages of a CityGML production pipeline: draping meshes
//! onto a terrain model, splitting them into Roof/Wall/Ground material
//! meshes, and merging per-building CityGML documents into one tile.

pub mod citygml;
pub mod cli;
pub mod config;
pub mod elevate;
pub mod error;
pub mod geometry;
pub mod io;
pub mod raster;
pub mod semantic;
pub mod stats;
pub mod utils;

pub use citygml::{Bounds, MergeConfig, MergeSummary, Merger};
pub use config::PipelineConfig;
pub use elevate::{compute_adjustment, elevate, AdjustmentReport, DrapeConfig, Elevator};
pub use error::{GeometryError, PipelineError, RasterError, Result, SampleError};
pub use geometry::{BoundingBox, Face, Mesh};
pub use raster::{GeoTransform, RasterHandle, RasterSource, SampleMode};
pub use semantic::{classify, Classification, ClassifierConfig, Colorizer, Material, MaterialGroup};
pub use stats::{ElevationStats, FileFailure, MaterialStats, RunStatistics};
