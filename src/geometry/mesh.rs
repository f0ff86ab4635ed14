// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polygon mesh that remembers its OBJ source lines

use crate::utils::math;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Polygon given by 0-based indices into the owning mesh's vertex list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Face {
    pub indices: Vec<usize>,
}

impl Face {
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// One line of the OBJ source
#[derive(Debug, Clone, PartialEq)]
pub enum ObjLine {
    /// A parsed `v` line, holding the index of the vertex it produced
    Vertex(usize),
    /// Any other line, reproduced byte for byte on output
    Verbatim(String),
}

/// Mesh loaded from an OBJ file
///
/// Vertex coordinates are the only thing the stages rewrite; every other
/// source line is retained so output can reproduce it in place.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Point3<f64>>,
    pub faces: Vec<Face>,
    pub(crate) lines: Vec<ObjLine>,
    /// Vertex or face lines that could not be parsed and were skipped
    pub malformed_lines: usize,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mesh directly from geometry, with no source text behind it
    pub fn from_geometry(vertices: Vec<Point3<f64>>, faces: Vec<Face>) -> Self {
        let lines = (0..vertices.len()).map(ObjLine::Vertex).collect();
        Self {
            vertices,
            faces,
            lines,
            malformed_lines: 0,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn lines(&self) -> &[ObjLine] {
        &self.lines
    }

    /// Original non-vertex lines, in source order
    pub fn verbatim_lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().filter_map(|line| match line {
            ObjLine::Verbatim(text) => Some(text.as_str()),
            ObjLine::Vertex(_) => None,
        })
    }

    pub fn min_z(&self) -> Option<f64> {
        self.vertices.iter().map(|v| v.z).reduce(f64::min)
    }

    /// Rigidly shift every vertex along z
    pub fn translate_z(&mut self, dz: f64) {
        for vertex in &mut self.vertices {
            vertex.z += dz;
        }
    }

    /// Unit normal of a face, taken from its first three vertices.
    /// Degenerate faces report straight up.
    pub fn face_normal(&self, face: &Face) -> Vector3<f64> {
        if face.len() < 3 {
            return Vector3::z();
        }
        math::polygon_normal(
            &self.vertices[face.indices[0]],
            &self.vertices[face.indices[1]],
            &self.vertices[face.indices[2]],
        )
    }

    pub fn face_average_z(&self, face: &Face) -> f64 {
        if face.is_empty() {
            return 0.0;
        }
        let sum: f64 = face.indices.iter().map(|&i| self.vertices[i].z).sum();
        sum / face.len() as f64
    }
}
