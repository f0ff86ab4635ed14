// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - reading, discovering, and writing stage files

mod discovery;
mod footprint;
mod material;
mod obj;

pub use discovery::discover_files;
pub use footprint::{read_footprints, parse_footprints, FootprintHints};
pub use material::{render_material_obj, render_mtl, write_material_files, MaterialFiles};
pub use obj::{parse_obj, read_obj, render_obj, write_obj};

use crate::error::{PipelineError, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Read a whole text file
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| PipelineError::access(path, e))
}

/// Write `contents` to `path` so the file appears complete or not at all.
///
/// The data goes to a temporary file in the destination directory first and
/// is then renamed over the target.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(|e| PipelineError::access(dir, e))?;
    file.write_all(contents.as_bytes())
        .and_then(|_| file.flush())
        .map_err(|e| PipelineError::access(path, e))?;
    file.persist(path)
        .map_err(|e| PipelineError::access(path, e.error))?;
    Ok(())
}

/// Final path component for messages, or the whole path if there is none
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Create a directory and its parents if missing
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| PipelineError::access(path, e))
}
