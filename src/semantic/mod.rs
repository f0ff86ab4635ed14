// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Semantic surface classification
//!
//! Faces are labelled Roof, Wall or Ground from their normal and their
//! height relative to an estimated ground plane, then each label gets its
//! own compact mesh.

mod classify;
mod colorizer;
mod ground;
mod material;

pub use classify::{classify, classify_face, Classification, ClassifierConfig, MaterialGroup};
pub use colorizer::Colorizer;
pub use ground::estimate_ground_height;
pub use material::{Material, MaterialPalette, Rgba};
