// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Batch draping of a directory of meshes

use super::drape::{elevate, AdjustmentReport, DrapeConfig};
use crate::error::{GeometryError, Result};
use crate::io;
use crate::raster::RasterHandle;
use crate::stats::{ElevationStats, RunStatistics};
use indicatif::ProgressBar;
use log::{debug, info, warn};
use std::path::Path;

/// Drapes OBJ files onto one terrain raster.
///
/// The elevator owns the raster for the whole run; it is released when the
/// elevator is dropped.
pub struct Elevator {
    raster: RasterHandle,
    config: DrapeConfig,
    stats: RunStatistics,
    elevation: ElevationStats,
}

impl Elevator {
    pub fn new(raster: RasterHandle, config: DrapeConfig) -> Self {
        Self {
            raster,
            config,
            stats: RunStatistics::new(),
            elevation: ElevationStats::default(),
        }
    }

    pub fn stats(&self) -> &RunStatistics {
        &self.stats
    }

    pub fn elevation(&self) -> &ElevationStats {
        &self.elevation
    }

    /// Drape one file and write it under the same name into `output_dir`
    pub fn process_file(&mut self, input: &Path, output_dir: &Path) -> Result<AdjustmentReport> {
        let mesh = io::read_obj(input)?;
        if mesh.vertices.is_empty() {
            return Err(GeometryError::NoVertices.into());
        }
        debug!("Loaded {} vertices", mesh.vertex_count());

        let (shifted, report) = elevate(&mesh, &self.raster, &self.config)?;
        let output = output_dir.join(io::file_name(input));
        io::write_obj(&shifted, &output)?;

        self.elevation.record(report.adjustment);
        Ok(report)
    }

    /// Drape every `*.obj` file of `input_dir` in name order, recording
    /// per-file failures. Returns the number of files found.
    pub fn run(
        &mut self,
        input_dir: &Path,
        output_dir: &Path,
        progress: Option<&ProgressBar>,
    ) -> Result<usize> {
        io::ensure_dir(output_dir)?;
        let files = io::discover_files(input_dir, &["obj"])?;
        if files.is_empty() {
            warn!("No OBJ files found in directory: {}", input_dir.display());
            self.stats.finish();
            return Ok(0);
        }
        info!("Found {} OBJ files to process", files.len());
        if let Some(pb) = progress {
            pb.set_length(files.len() as u64);
        }

        for path in &files {
            let name = io::file_name(path);
            if let Some(pb) = progress {
                pb.set_message(name.clone());
            }

            match self.process_file(path, output_dir) {
                Ok(report) => {
                    debug!("{}: adjusted by {:.3}", name, report.adjustment);
                    self.stats.record_success();
                }
                Err(e) => {
                    warn!("Failed to elevate {}: {}", name, e);
                    self.stats.record_failure(name, e);
                }
            }

            if let Some(pb) = progress {
                pb.inc(1);
            }
        }

        self.stats.finish();
        Ok(files.len())
    }

    pub fn into_stats(self) -> (RunStatistics, ElevationStats) {
        (self.stats, self.elevation)
    }
}
