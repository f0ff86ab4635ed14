// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Terrain draping
//!
//! Each mesh is moved as a rigid body along z so that its lowest vertices
//! rest on the mean terrain height sampled beneath them.

mod drape;
mod elevator;

pub use drape::{compute_adjustment, elevate, AdjustmentReport, DrapeConfig};
pub use elevator::Elevator;
