// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Semantic split end to end: classification invariants and written files

use anyhow::Result;
use cityforge::io::{parse_footprints, parse_obj, read_obj, FootprintHints};
use cityforge::{classify, ClassifierConfig, Colorizer, Material};
use std::fs;
use tempfile::TempDir;

/// Gabled house on a 10x6 plan with a ground slab, a porch slab above
/// ground level and one vertex no face uses
const HOUSE: &str = "\
# house
v 0 0 0
v 10 0 0
v 10 6 0
v 0 6 0
v 0 0 4
v 10 0 4
v 10 6 4
v 0 6 4
v 0 3 6
v 10 3 6
v 99 99 99
v 10 0 1
v 12 0 1
v 12 2 1
v 10 2 1
f 1 4 3 2
f 1 2 6 5
f 2 3 7 6
f 3 4 8 7
f 4 1 5 8
f 5 6 10 9
f 7 8 9 10
f 6 7 10
f 8 5 9
f 12 13 14 15
";

const FOOTPRINTS: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "geometry": {"type": "Polygon", "coordinates": [[[0,0],[10,0],[10,6],[0,6],[0,0]]]}},
    {"type": "Feature", "geometry": {"type": "Point", "coordinates": [5,3]}},
    {"type": "Feature", "geometry": null}
  ]
}"#;

fn footprints() -> FootprintHints {
    parse_footprints(FOOTPRINTS, "footprints.geojson").unwrap()
}

#[test]
fn test_footprint_counting() {
    assert_eq!(footprints().polygon_count, 1);
}

#[test]
fn test_every_face_lands_in_exactly_one_group() {
    let mesh = parse_obj(HOUSE, "house.obj");
    let result = classify(&mesh, &footprints(), &ClassifierConfig::default()).unwrap();

    let total: usize = result.groups.iter().map(|g| g.faces.len()).sum();
    assert_eq!(total, mesh.face_count());
    assert_eq!(result.face_count(), mesh.face_count());

    let count = |m| result.group(m).map(|g| g.faces.len()).unwrap_or(0);
    assert_eq!(count(Material::Ground), 1);
    // Gable ends are vertical, so they count as walls
    assert_eq!(count(Material::Wall), 6);
    // Both roof slopes plus the raised porch slab
    assert_eq!(count(Material::Roof), 3);
}

#[test]
fn test_remapped_indices_stay_in_range() {
    let mesh = parse_obj(HOUSE, "house.obj");
    let result = classify(&mesh, &footprints(), &ClassifierConfig::default()).unwrap();

    for group in result.non_empty_groups() {
        let n = group.optimized_vertices.len();
        assert!(n <= group.distinct_vertex_count());
        for face in group.remapped_faces() {
            assert!(face.iter().all(|&i| (1..=n).contains(&i)), "{:?}", face);
        }
    }
    assert!(result
        .groups
        .iter()
        .all(|g| !g.optimized_vertices.iter().any(|v| v.x == 99.0)));
}

#[test]
fn test_written_material_meshes_are_self_contained() -> Result<()> {
    let dir = TempDir::new()?;
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    fs::create_dir(&input)?;
    fs::write(input.join("house.obj"), HOUSE)?;

    let mut colorizer = Colorizer::new(ClassifierConfig::default(), footprints());
    assert_eq!(colorizer.run(&input, &output, None)?, 1);

    let wall = read_obj(&output.join("house-wall.obj"))?;
    assert_eq!(wall.face_count(), 6);
    assert_eq!(wall.vertex_count(), 10);
    assert_eq!(wall.malformed_lines, 0);

    let wall_text = fs::read_to_string(output.join("house-wall.obj"))?;
    assert!(wall_text.contains("mtllib house-wall.mtl"));
    assert!(wall_text.contains("usemtl Wall"));

    let mtl = fs::read_to_string(output.join("house-ground.mtl"))?;
    assert!(mtl.contains("newmtl Ground"));
    assert!(mtl.contains("Ka 0.000 0.000 0.000"));
    assert!(mtl.contains("illum 1"));

    let (run, materials) = colorizer.into_stats();
    assert_eq!(run.processed, 1);
    assert_eq!(materials.total_split_files(), 3);
    assert_eq!(materials.get(Material::Ground).optimized_vertices, 4);
    Ok(())
}

#[test]
fn test_custom_palette_reaches_mtl_files() -> Result<()> {
    let dir = TempDir::new()?;
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    fs::create_dir(&input)?;
    fs::write(input.join("house.obj"), HOUSE)?;

    let mut config = ClassifierConfig::default();
    config.palette.roof.r = 0.25;
    config.palette.roof.a = 0.5;
    let mut colorizer = Colorizer::new(config, FootprintHints::default());
    colorizer.run(&input, &output, None)?;

    let mtl = fs::read_to_string(output.join("house-roof.mtl"))?;
    assert!(mtl.contains("Kd 0.250000 "));
    assert!(mtl.contains("d 0.500000"));
    Ok(())
}
