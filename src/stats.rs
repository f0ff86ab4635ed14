// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Run statistics collected by the stage loops

use crate::error::Result;
use crate::semantic::Material;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::Path;
use std::time::{Duration, Instant};

/// A file that could not be processed, and why
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileFailure {
    pub file: String,
    pub error: String,
}

/// Outcome counts of one stage run
#[derive(Debug, Clone, Serialize)]
pub struct RunStatistics {
    pub processed: usize,
    pub failures: Vec<FileFailure>,
    pub elapsed_seconds: f64,
    #[serde(skip)]
    started: Instant,
}

impl Default for RunStatistics {
    fn default() -> Self {
        Self::new()
    }
}

impl RunStatistics {
    pub fn new() -> Self {
        Self {
            processed: 0,
            failures: Vec::new(),
            elapsed_seconds: 0.0,
            started: Instant::now(),
        }
    }

    pub fn record_success(&mut self) {
        self.processed += 1;
    }

    pub fn record_failure(&mut self, file: impl Into<String>, error: impl Display) {
        self.failures.push(FileFailure {
            file: file.into(),
            error: error.to_string(),
        });
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Freeze the elapsed time
    pub fn finish(&mut self) {
        self.elapsed_seconds = self.started.elapsed().as_secs_f64();
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_secs_f64(self.elapsed_seconds)
    }
}

/// Vertical adjustments applied by the drape stage
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ElevationStats {
    pub count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub total: f64,
}

impl ElevationStats {
    pub fn record(&mut self, adjustment: f64) {
        self.count += 1;
        self.total += adjustment;
        self.min = Some(self.min.map_or(adjustment, |m| m.min(adjustment)));
        self.max = Some(self.max.map_or(adjustment, |m| m.max(adjustment)));
    }

    pub fn average(&self) -> Option<f64> {
        (self.count > 0).then(|| self.total / self.count as f64)
    }
}

/// Split-file and vertex counts for one material
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MaterialCounts {
    pub split_files: usize,
    pub original_vertices: usize,
    pub optimized_vertices: usize,
}

impl MaterialCounts {
    pub fn reduction_percent(&self) -> f64 {
        crate::utils::math::reduction_percent(self.original_vertices, self.optimized_vertices)
    }
}

/// Per-material totals across a semantic run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MaterialStats {
    pub materials: BTreeMap<Material, MaterialCounts>,
}

impl MaterialStats {
    pub fn record(&mut self, material: Material, original: usize, optimized: usize) {
        let counts = self.materials.entry(material).or_default();
        counts.split_files += 1;
        counts.original_vertices += original;
        counts.optimized_vertices += optimized;
    }

    pub fn get(&self, material: Material) -> MaterialCounts {
        self.materials.get(&material).copied().unwrap_or_default()
    }

    pub fn total_split_files(&self) -> usize {
        self.materials.values().map(|c| c.split_files).sum()
    }
}

#[derive(Serialize)]
struct Report<'a, T: Serialize> {
    stage: &'a str,
    version: &'a str,
    generated: String,
    run: &'a RunStatistics,
    details: &'a T,
}

/// Write the run outcome and stage details as pretty JSON
pub fn write_report<T: Serialize>(
    path: &Path,
    stage: &str,
    run: &RunStatistics,
    details: &T,
) -> Result<()> {
    let report = Report {
        stage,
        version: env!("CARGO_PKG_VERSION"),
        generated: chrono::Local::now().to_rfc3339(),
        run,
        details,
    };
    let json = serde_json::to_string_pretty(&report)?;
    crate::io::write_atomic(path, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tempfile::TempDir;

    #[test]
    fn test_elevation_stats() {
        let mut stats = ElevationStats::default();
        assert_eq!(stats.average(), None);
        for adj in [2.0, -1.0, 5.0] {
            stats.record(adj);
        }
        assert_eq!(stats.min, Some(-1.0));
        assert_eq!(stats.max, Some(5.0));
        assert_relative_eq!(stats.average().unwrap(), 2.0);
    }

    #[test]
    fn test_material_stats_accumulate() {
        let mut stats = MaterialStats::default();
        stats.record(Material::Roof, 100, 20);
        stats.record(Material::Roof, 100, 30);
        stats.record(Material::Wall, 50, 50);

        let roof = stats.get(Material::Roof);
        assert_eq!(roof.split_files, 2);
        assert_relative_eq!(roof.reduction_percent(), 75.0);
        assert_relative_eq!(stats.get(Material::Wall).reduction_percent(), 0.0);
        assert_eq!(stats.get(Material::Ground), MaterialCounts::default());
        assert_eq!(stats.total_split_files(), 3);
    }

    #[test]
    fn test_write_report() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("report.json");

        let mut run = RunStatistics::new();
        run.record_success();
        run.record_failure("bad.obj", "no valid vertices found");
        run.finish();

        let mut materials = MaterialStats::default();
        materials.record(Material::Ground, 8, 4);
        write_report(&path, "semantic", &run, &materials)?;

        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
        assert_eq!(value["stage"], "semantic");
        assert_eq!(value["run"]["processed"], 1);
        assert_eq!(value["run"]["failures"][0]["file"], "bad.obj");
        assert_eq!(value["details"]["materials"]["Ground"]["optimized_vertices"], 4);
        Ok(())
    }
}
