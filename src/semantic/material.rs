// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Surface materials and their display colors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic surface class of a face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Material {
    Roof,
    Wall,
    Ground,
}

impl Material {
    /// Fixed output order of material groups
    pub const ALL: [Material; 3] = [Material::Roof, Material::Wall, Material::Ground];

    pub fn name(&self) -> &'static str {
        match self {
            Material::Roof => "Roof",
            Material::Wall => "Wall",
            Material::Ground => "Ground",
        }
    }

    /// File name suffix, e.g. `building-roof.obj`
    pub fn suffix(&self) -> &'static str {
        match self {
            Material::Roof => "roof",
            Material::Wall => "wall",
            Material::Ground => "ground",
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Diffuse color and opacity written to a material file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }
}

/// Color table used when writing material files
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialPalette {
    pub roof: Rgba,
    pub wall: Rgba,
    pub ground: Rgba,
}

impl Default for MaterialPalette {
    fn default() -> Self {
        Self {
            roof: Rgba::new(0.6627, 0.2627, 0.0863, 1.0),
            wall: Rgba::new(0.8314, 0.8314, 0.8471, 1.0),
            ground: Rgba::new(0.82, 0.41, 0.12, 1.0),
        }
    }
}

impl MaterialPalette {
    pub fn color(&self, material: Material) -> Rgba {
        match material {
            Material::Roof => self.roof,
            Material::Wall => self.wall,
            Material::Ground => self.ground,
        }
    }
}
