// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CityGML merging
//!
//! Per-building CityGML documents are combined by scanning for known
//! markers rather than by parsing XML, so the copied city objects keep
//! their exact text.

mod bounds;
mod document;
mod merger;
mod scan;

pub use bounds::{extract_bounds, merge_bounds, Bounds};
pub use document::{assemble, MergedDocument};
pub use merger::{MergeConfig, MergeSummary, Merger};
pub use scan::{
    closing_tag, extract_city_objects, is_city_model, rewrite_descriptions, rewrite_identifiers,
    root_tag, DEFAULT_ROOT_TAG,
};
