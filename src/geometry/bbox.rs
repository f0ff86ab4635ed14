// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Axis-aligned extents of CityGML envelopes

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Lower and upper corner of an axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl BoundingBox {
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    /// Smallest box holding both
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        Self::new(self.min.inf(&other.min), self.max.sup(&other.max))
    }
}
