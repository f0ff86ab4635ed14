// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - mesh representation and bounding boxes

mod bbox;
mod mesh;

pub use bbox::BoundingBox;
pub use mesh::{Face, Mesh, ObjLine};
pub use nalgebra::{Point3, Vector3};
