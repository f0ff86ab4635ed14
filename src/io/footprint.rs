// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Building footprint GeoJSON

use crate::error::{PipelineError, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    #[serde(rename = "type")]
    kind: String,
}

/// What the classifier knows about the building footprints.
///
/// Only polygonal features are counted; their coordinates are not used by
/// the classification rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FootprintHints {
    pub polygon_count: usize,
}

/// Count `Polygon` and `MultiPolygon` features of a GeoJSON FeatureCollection
pub fn parse_footprints(source: &str, name: &str) -> Result<FootprintHints> {
    let collection: FeatureCollection =
        serde_json::from_str(source).map_err(|e| PipelineError::Parse {
            file: name.to_string(),
            line: e.line(),
            message: e.to_string(),
        })?;

    let polygon_count = collection
        .features
        .iter()
        .filter_map(|f| f.geometry.as_ref())
        .filter(|g| matches!(g.kind.as_str(), "Polygon" | "MultiPolygon"))
        .count();

    Ok(FootprintHints { polygon_count })
}

pub fn read_footprints(path: &Path) -> Result<FootprintHints> {
    let source = super::read_text(path)?;
    parse_footprints(&source, &path.display().to_string())
}
