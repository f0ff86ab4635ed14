// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Face classification and per-material vertex compaction

use super::ground::estimate_ground_height;
use super::material::{Material, MaterialPalette};
use crate::error::{GeometryError, Result};
use crate::geometry::{Face, Mesh};
use crate::io::FootprintHints;
use log::debug;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Classifier thresholds and output colors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Number of histogram bins for the ground estimate
    pub histogram_bins: usize,
    /// Fraction of the fullest bin a bin must exceed to count as ground
    pub peak_fraction: f64,
    /// Maximum distance between a face's mean z and the ground height
    pub ground_tolerance: f64,
    /// `|normal.z|` above which a face is horizontal
    pub horizontal_threshold: f64,
    /// `|normal.z|` below which a face is vertical
    pub vertical_threshold: f64,
    pub palette: MaterialPalette,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            histogram_bins: 50,
            peak_fraction: 0.1,
            ground_tolerance: 0.01,
            horizontal_threshold: 0.95,
            vertical_threshold: 0.1,
            palette: MaterialPalette::default(),
        }
    }
}

/// Faces of one material with their own compact vertex list
#[derive(Debug, Clone)]
pub struct MaterialGroup {
    pub material: Material,
    /// Faces in source order, indexing the original mesh
    pub faces: Vec<Face>,
    /// Referenced vertices, ordered by original index
    pub optimized_vertices: Vec<Point3<f64>>,
    /// Original vertex index to position in `optimized_vertices`
    pub remap: BTreeMap<usize, usize>,
}

impl MaterialGroup {
    fn new(material: Material) -> Self {
        Self {
            material,
            faces: Vec::new(),
            optimized_vertices: Vec::new(),
            remap: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Number of distinct original vertices referenced by the faces
    pub fn distinct_vertex_count(&self) -> usize {
        self.faces
            .iter()
            .flat_map(|f| f.indices.iter().copied())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Faces rewritten through the remap, as 1-based OBJ indices
    pub fn remapped_faces(&self) -> impl Iterator<Item = Vec<usize>> + '_ {
        self.faces.iter().map(|face| {
            face.indices
                .iter()
                .filter_map(|old| self.remap.get(old))
                .map(|new| new + 1)
                .collect()
        })
    }

    /// Keep only the vertices the faces use, ordered by original index
    fn compact(&mut self, vertices: &[Point3<f64>]) {
        let used: BTreeSet<usize> = self
            .faces
            .iter()
            .flat_map(|f| f.indices.iter().copied())
            .collect();

        self.remap = used
            .iter()
            .enumerate()
            .map(|(new, &old)| (old, new))
            .collect();
        self.optimized_vertices = used.iter().map(|&old| vertices[old]).collect();
    }
}

/// Result of classifying one mesh
#[derive(Debug, Clone)]
pub struct Classification {
    pub ground_height: f64,
    /// Vertex count of the source mesh
    pub original_vertex_count: usize,
    /// Groups in the order Roof, Wall, Ground; empty groups included
    pub groups: Vec<MaterialGroup>,
}

impl Classification {
    pub fn group(&self, material: Material) -> Option<&MaterialGroup> {
        self.groups.iter().find(|g| g.material == material)
    }

    pub fn non_empty_groups(&self) -> impl Iterator<Item = &MaterialGroup> {
        self.groups.iter().filter(|g| !g.is_empty())
    }

    pub fn face_count(&self) -> usize {
        self.groups.iter().map(|g| g.faces.len()).sum()
    }
}

/// Assign a face to exactly one material. Ground is tested first, then
/// Wall; everything else is Roof.
pub fn classify_face(
    mesh: &Mesh,
    face: &Face,
    ground_height: f64,
    config: &ClassifierConfig,
) -> Material {
    let normal = mesh.face_normal(face);
    let average_z = mesh.face_average_z(face);

    if (average_z - ground_height).abs() <= config.ground_tolerance
        && normal.z.abs() > config.horizontal_threshold
    {
        Material::Ground
    } else if normal.z.abs() < config.vertical_threshold {
        Material::Wall
    } else {
        Material::Roof
    }
}

/// Split a mesh into Roof, Wall and Ground groups, each with a compacted
/// vertex list.
///
/// Footprint hints are carried for context only; the rules use heights and
/// face normals.
pub fn classify(
    mesh: &Mesh,
    footprints: &FootprintHints,
    config: &ClassifierConfig,
) -> Result<Classification> {
    if mesh.vertices.is_empty() {
        return Err(GeometryError::NoVertices.into());
    }
    if mesh.faces.is_empty() {
        return Err(GeometryError::NoFaces.into());
    }

    let zs: Vec<f64> = mesh.vertices.iter().map(|v| v.z).collect();
    let ground_height = estimate_ground_height(&zs, config.histogram_bins, config.peak_fraction);
    debug!(
        "Ground height {:.2} ({} footprint polygons available)",
        ground_height, footprints.polygon_count
    );

    let mut groups: Vec<MaterialGroup> = Material::ALL.iter().map(|&m| MaterialGroup::new(m)).collect();
    for face in &mesh.faces {
        let material = classify_face(mesh, face, ground_height, config);
        if let Some(group) = groups.iter_mut().find(|g| g.material == material) {
            group.faces.push(face.clone());
        }
    }

    for group in &mut groups {
        group.compact(&mesh.vertices);
        if !group.is_empty() {
            debug!(
                "{}: {} faces, {} of {} vertices",
                group.material,
                group.faces.len(),
                group.optimized_vertices.len(),
                mesh.vertex_count()
            );
        }
    }

    Ok(Classification {
        ground_height,
        original_vertex_count: mesh.vertex_count(),
        groups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Flat 10x10 slab at z=0 plus a square at `roof_z`
    fn slab_and_square(roof_z: f64) -> Mesh {
        let mut vertices = Vec::new();
        for i in 0..10 {
            vertices.push(Point3::new(i as f64, 0.0, 0.0));
        }
        vertices.extend([
            Point3::new(0.0, 0.0, roof_z),
            Point3::new(1.0, 0.0, roof_z),
            Point3::new(1.0, 1.0, roof_z),
            Point3::new(0.0, 1.0, roof_z),
        ]);
        Mesh::from_geometry(vertices, vec![Face::new(vec![10, 11, 12, 13])])
    }

    #[test]
    fn test_horizontal_face_at_ground_is_ground() {
        let mesh = slab_and_square(0.0);
        let face = &mesh.faces[0];
        assert_eq!(classify_face(&mesh, face, 0.0, &ClassifierConfig::default()), Material::Ground);
    }

    #[test]
    fn test_raised_horizontal_face_is_roof() {
        let mesh = slab_and_square(2.0);
        let face = &mesh.faces[0];
        assert_eq!(classify_face(&mesh, face, 0.0, &ClassifierConfig::default()), Material::Roof);
    }

    #[test]
    fn test_vertical_face_is_wall() {
        let mesh = Mesh::from_geometry(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 1.0),
                Point3::new(0.0, 0.0, 1.0),
            ],
            vec![Face::new(vec![0, 1, 2, 3])],
        );
        assert_eq!(
            classify_face(&mesh, &mesh.faces[0], 0.0, &ClassifierConfig::default()),
            Material::Wall
        );
    }

    #[test]
    fn test_degenerate_face_defaults_upward() {
        let mesh = Mesh::from_geometry(
            vec![Point3::new(0.0, 0.0, 5.0); 3],
            vec![Face::new(vec![0, 1, 2])],
        );
        // Upward normal at ground height
        assert_eq!(
            classify_face(&mesh, &mesh.faces[0], 5.0, &ClassifierConfig::default()),
            Material::Ground
        );
    }

    /// Box without a lid: one ground face, four walls, and a pitched roof
    fn house() -> Mesh {
        let v = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(4.0, 0.0, 0.0),
            Point3::new(4.0, 4.0, 0.0),
            Point3::new(0.0, 4.0, 0.0),
            Point3::new(0.0, 0.0, 3.0),
            Point3::new(4.0, 0.0, 3.0),
            Point3::new(4.0, 4.0, 3.0),
            Point3::new(0.0, 4.0, 3.0),
            Point3::new(2.0, 2.0, 5.0),
        ];
        let f = vec![
            Face::new(vec![0, 3, 2, 1]),
            Face::new(vec![0, 1, 5, 4]),
            Face::new(vec![1, 2, 6, 5]),
            Face::new(vec![2, 3, 7, 6]),
            Face::new(vec![3, 0, 4, 7]),
            Face::new(vec![4, 5, 8]),
            Face::new(vec![5, 6, 8]),
            Face::new(vec![6, 7, 8]),
            Face::new(vec![7, 4, 8]),
        ];
        Mesh::from_geometry(v, f)
    }

    #[test]
    fn test_classify_partitions_faces() {
        let mesh = house();
        let result = classify(&mesh, &FootprintHints::default(), &ClassifierConfig::default()).unwrap();

        assert_eq!(result.face_count(), mesh.face_count());
        assert_eq!(result.group(Material::Ground).unwrap().faces.len(), 1);
        assert_eq!(result.group(Material::Wall).unwrap().faces.len(), 4);
        assert_eq!(result.group(Material::Roof).unwrap().faces.len(), 4);

        let order: Vec<Material> = result.groups.iter().map(|g| g.material).collect();
        assert_eq!(order, Material::ALL.to_vec());
    }

    #[test]
    fn test_compaction_is_sorted_and_in_range() {
        let mesh = house();
        let result = classify(&mesh, &FootprintHints::default(), &ClassifierConfig::default()).unwrap();

        let roof = result.group(Material::Roof).unwrap();
        assert_eq!(roof.optimized_vertices.len(), 5);
        assert_eq!(roof.remap.keys().copied().collect::<Vec<_>>(), vec![4, 5, 6, 7, 8]);
        assert_eq!(roof.remap.values().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
        assert_eq!(roof.optimized_vertices[4], Point3::new(2.0, 2.0, 5.0));

        for group in result.non_empty_groups() {
            assert!(group.optimized_vertices.len() <= group.distinct_vertex_count());
            for face in group.remapped_faces() {
                assert!(face.iter().all(|&i| i >= 1 && i <= group.optimized_vertices.len()));
            }
        }

        let ground = result.group(Material::Ground).unwrap();
        let faces: Vec<Vec<usize>> = ground.remapped_faces().collect();
        assert_eq!(faces, vec![vec![1, 4, 3, 2]]);
    }

    #[test]
    fn test_empty_mesh_is_rejected() {
        let err = classify(&Mesh::new(), &FootprintHints::default(), &ClassifierConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("no valid vertices"));

        let mesh = Mesh::from_geometry(vec![Point3::origin()], vec![]);
        assert!(classify(&mesh, &FootprintHints::default(), &ClassifierConfig::default()).is_err());
    }
}
