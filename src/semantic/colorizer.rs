// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Batch splitting of building meshes into material files

use super::classify::{classify, ClassifierConfig};
use crate::error::Result;
use crate::io::{self, FootprintHints, MaterialFiles};
use crate::stats::{MaterialStats, RunStatistics};
use indicatif::ProgressBar;
use log::{debug, info, warn};
use std::path::Path;

/// Splits every OBJ file of a directory into per-material OBJ/MTL pairs
pub struct Colorizer {
    config: ClassifierConfig,
    footprints: FootprintHints,
    stats: RunStatistics,
    materials: MaterialStats,
}

impl Colorizer {
    pub fn new(config: ClassifierConfig, footprints: FootprintHints) -> Self {
        Self {
            config,
            footprints,
            stats: RunStatistics::new(),
            materials: MaterialStats::default(),
        }
    }

    pub fn stats(&self) -> &RunStatistics {
        &self.stats
    }

    pub fn materials(&self) -> &MaterialStats {
        &self.materials
    }

    /// Classify one mesh and write a file pair for each non-empty material
    pub fn process_file(&mut self, input: &Path, output_dir: &Path) -> Result<Vec<MaterialFiles>> {
        let mesh = io::read_obj(input)?;
        debug!(
            "Loaded {} vertices and {} faces ({} malformed lines skipped)",
            mesh.vertex_count(),
            mesh.face_count(),
            mesh.malformed_lines
        );

        let classification = classify(&mesh, &self.footprints, &self.config)?;
        debug!("Ground height detected: {:.2}", classification.ground_height);

        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut written = Vec::new();
        for group in classification.non_empty_groups() {
            let color = self.config.palette.color(group.material);
            let files = io::write_material_files(output_dir, &stem, group, color)?;
            debug!(
                "Created {} with {} vertices and {} faces",
                files.obj.display(),
                group.optimized_vertices.len(),
                group.faces.len()
            );
            written.push(files);
        }

        for group in classification.non_empty_groups() {
            self.materials.record(
                group.material,
                classification.original_vertex_count,
                group.optimized_vertices.len(),
            );
        }

        Ok(written)
    }

    /// Process every `*.obj` file of `input_dir` in name order.
    ///
    /// Per-file failures are recorded and the run continues. Returns the
    /// number of files found.
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
            debug!("Processing: {}", name);

            match self.process_file(path, output_dir) {
                Ok(_) => self.stats.record_success(),
                Err(e) => {
                    warn!("Failed to process {}: {}", name, e);
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

    pub fn into_stats(self) -> (RunStatistics, MaterialStats) {
        (self.stats, self.materials)
    }
}
