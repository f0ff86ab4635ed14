// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Directory-level CityGML merge

use super::bounds::{extract_bounds, merge_bounds, Bounds};
use super::document::{assemble, MergedDocument};
use super::scan::{
    extract_city_objects, is_city_model, rewrite_descriptions, rewrite_identifiers, root_tag,
    DEFAULT_ROOT_TAG,
};
use crate::error::{PipelineError, Result};
use crate::io;
use crate::stats::RunStatistics;
use indicatif::ProgressBar;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name and author stamped into the merged document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// `gml:name` of the result and replacement for the `UUID` id prefix
    pub name: String,
    /// Replaces `converter` in "created by converter" descriptions
    pub author: String,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            name: "Merged_CityModel".to_string(),
            author: "cityforge".to_string(),
        }
    }
}

/// What a merge run consumed and produced
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MergeSummary {
    pub files_found: usize,
    pub files_accepted: usize,
    pub files_rejected: usize,
    pub files_with_bounds: usize,
    pub city_objects: usize,
    pub bounds: Option<Bounds>,
    pub output: Option<PathBuf>,
}

/// Merges the CityGML files of one directory into a single document
pub struct Merger {
    config: MergeConfig,
    stats: RunStatistics,
    summary: MergeSummary,
}

impl Merger {
    pub fn new(config: MergeConfig) -> Self {
        Self {
            config,
            stats: RunStatistics::new(),
            summary: MergeSummary::default(),
        }
    }

    pub fn stats(&self) -> &RunStatistics {
        &self.stats
    }

    pub fn summary(&self) -> &MergeSummary {
        &self.summary
    }

    /// Read, filter and rewrite every `*.gml`/`*.xml` file of `input_dir`.
    ///
    /// Unreadable files and files that do not mention `CityModel` are
    /// skipped. Fails only if nothing usable is found.
    pub fn build(
        &mut self,
        input_dir: &Path,
        progress: Option<&ProgressBar>,
    ) -> Result<MergedDocument> {
        let files = io::discover_files(input_dir, &["gml", "xml"])?;
        if files.is_empty() {
            return Err(PipelineError::EmptyResult(format!(
                "no CityGML files found in directory: {}",
                input_dir.display()
            )));
        }
        self.summary.files_found = files.len();
        info!("Found {} potential CityGML files", files.len());
        if let Some(pb) = progress {
            pb.set_length(files.len() as u64);
        }

        let mut root: Option<String> = None;
        let mut all_bounds = Vec::new();
        let mut city_objects = Vec::new();

        for path in &files {
            let name = io::file_name(path);
            if let Some(pb) = progress {
                pb.set_message(name.clone());
            }

            match io::read_text(path) {
                Ok(content) if is_city_model(&content) => {
                    if root.is_none() {
                        root = root_tag(&content);
                    }
                    if let Some(bounds) = extract_bounds(&content) {
                        all_bounds.push(bounds);
                    }

                    let objects = extract_city_objects(&content);
                    debug!("Extracted {} city objects from {}", objects.len(), name);
                    city_objects.extend(objects.into_iter().map(|span| {
                        let span = rewrite_identifiers(span, &self.config.name);
                        rewrite_descriptions(&span, &self.config.author)
                    }));
                    self.stats.record_success();
                }
                Ok(_) => {
                    let err = PipelineError::Validation(name.clone());
                    warn!("Skipping {}", err);
                    self.stats.record_failure(name, err);
                }
                Err(e) => {
                    warn!("Could not read {}: {}", name, e);
                    self.stats.record_failure(name, e);
                }
            }

            if let Some(pb) = progress {
                pb.inc(1);
            }
        }

        self.summary.files_accepted = self.stats.processed;
        self.summary.files_rejected = self.stats.failed();
        if self.stats.processed == 0 {
            return Err(PipelineError::EmptyResult(
                "no valid CityGML files found in the directory".to_string(),
            ));
        }

        let bounds = merge_bounds(&all_bounds);
        self.summary.files_with_bounds = all_bounds.len();
        self.summary.city_objects = city_objects.len();
        self.summary.bounds = bounds.clone();

        Ok(MergedDocument {
            root_tag: root.unwrap_or_else(|| DEFAULT_ROOT_TAG.to_string()),
            name: self.config.name.clone(),
            author: self.config.author.clone(),
            bounds,
            city_objects,
            source_files: self.stats.processed,
            generated: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        })
    }

    /// Merge `input_dir` into the file `output`, creating its directory
    pub fn merge(
        &mut self,
        input_dir: &Path,
        output: &Path,
        progress: Option<&ProgressBar>,
    ) -> Result<&MergeSummary> {
        let document = match self.build(input_dir, progress) {
            Ok(document) => document,
            Err(e) => {
                self.stats.finish();
                return Err(e);
            }
        };

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            io::ensure_dir(parent)?;
        }
        io::write_atomic(output, &assemble(&document))?;
        info!(
            "Merged {} city objects from {} files into {}",
            self.summary.city_objects,
            self.summary.files_accepted,
            output.display()
        );

        self.summary.output = Some(output.to_path_buf());
        self.stats.finish();
        Ok(&self.summary)
    }

    pub fn into_stats(self) -> (RunStatistics, MergeSummary) {
        (self.stats, self.summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_empty_directory_is_fatal() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let mut merger = Merger::new(MergeConfig::default());
        let err = merger.build(dir.path(), None).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyResult(_)));
        Ok(())
    }

    #[test]
    fn test_only_invalid_files_is_fatal() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join("a.gml"), "<Other/>")?;
        let mut merger = Merger::new(MergeConfig::default());
        let err = merger.build(dir.path(), None).unwrap_err();
        assert!(err.to_string().contains("no valid CityGML files"));
        assert_eq!(merger.stats().failures.len(), 1);
        Ok(())
    }

    #[test]
    fn test_failed_merge_keeps_stats_for_summary() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join("a.gml"), "<Other/>")?;
        fs::write(dir.path().join("b.xml"), "<catalog/>")?;
        let output = dir.path().join("out.gml");

        let mut merger = Merger::new(MergeConfig::default());
        assert!(merger.merge(dir.path(), &output, None).is_err());

        let (run, summary) = merger.into_stats();
        assert_eq!(run.processed, 0);
        assert_eq!(run.failures.len(), 2);
        assert_eq!(summary.files_found, 2);
        assert_eq!(summary.files_rejected, 2);
        assert!(summary.output.is_none());
        Ok(())
    }

    #[test]
    fn test_default_root_when_no_tag_names_city_model() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        // Mentions CityModel only in a comment
        fs::write(
            dir.path().join("a.xml"),
            "<!-- CityModel fragment --><cityObjectMember>x</cityObjectMember>",
        )?;
        let mut merger = Merger::new(MergeConfig::default());
        let doc = merger.build(dir.path(), None)?;
        assert_eq!(doc.root_tag, DEFAULT_ROOT_TAG);
        assert_eq!(doc.city_objects, vec!["<cityObjectMember>x</cityObjectMember>"]);
        assert!(doc.bounds.is_none());
        Ok(())
    }
}
