// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Input file discovery

use crate::error::{PipelineError, Result};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// List the files directly inside `dir` whose extension is one of
/// `extensions` (case-sensitive, without the dot), sorted by path.
pub fn discover_files(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(PipelineError::access(
            dir,
            io::Error::new(io::ErrorKind::NotFound, "not a directory"),
        ));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            PipelineError::access(path, io::Error::from(e))
        })?;
        let path = entry.path();
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.contains(&ext));
        if entry.file_type().is_file() && matches {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_discover_sorted_and_filtered() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        fs::write(temp_dir.path().join("b.gml"), "")?;
        fs::write(temp_dir.path().join("a.xml"), "")?;
        fs::write(temp_dir.path().join("c.txt"), "")?;
        fs::create_dir(temp_dir.path().join("nested.gml"))?;
        fs::create_dir(temp_dir.path().join("sub"))?;
        fs::write(temp_dir.path().join("sub").join("d.gml"), "")?;

        let files = discover_files(temp_dir.path(), &["gml", "xml"])?;
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.xml", "b.gml"]);
        Ok(())
    }

    #[test]
    fn test_missing_dir() {
        let result = discover_files(Path::new("/no/such/dir"), &["obj"]);
        assert!(matches!(result, Err(PipelineError::Access { .. })));
    }
}
