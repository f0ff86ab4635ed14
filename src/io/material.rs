// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Per-material OBJ and MTL output

use crate::error::Result;
use crate::semantic::{Material, MaterialGroup, Rgba};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Paths written for one material group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialFiles {
    pub material: Material,
    pub obj: PathBuf,
    pub mtl: PathBuf,
}

/// OBJ text for one group: header, material library, compacted vertices,
/// then the remapped faces.
pub fn render_material_obj(group: &MaterialGroup, mtl_name: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "# Generated by cityforge v{} - {} (optimized)",
        env!("CARGO_PKG_VERSION"),
        group.material
    );
    let _ = writeln!(
        out,
        "# Vertices: {}, Faces: {}",
        group.optimized_vertices.len(),
        group.faces.len()
    );
    let _ = writeln!(out, "mtllib {}", mtl_name);
    out.push('\n');

    for v in &group.optimized_vertices {
        let _ = writeln!(out, "v {:.6} {:.6} {:.6}", v.x, v.y, v.z);
    }
    out.push('\n');

    let _ = writeln!(out, "usemtl {}", group.material);
    for face in group.remapped_faces() {
        out.push('f');
        for index in face {
            let _ = write!(out, " {}", index);
        }
        out.push('\n');
    }
    out
}

/// MTL text with fixed ambient and specular terms
pub fn render_mtl(material: Material, color: Rgba) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "# Generated by cityforge v{} - {}\n",
        env!("CARGO_PKG_VERSION"),
        material
    );
    let _ = writeln!(out, "newmtl {}", material);
    out.push_str("Ka 0.000 0.000 0.000\n");
    let _ = writeln!(out, "Kd {:.6} {:.6} {:.6}", color.r, color.g, color.b);
    out.push_str("Ks 0.000 0.000 0.000\n");
    let _ = writeln!(out, "d {:.6}", color.a);
    out.push_str("illum 1\n");
    out
}

/// Write `<stem>-<suffix>.obj` and its `.mtl` companion into `output_dir`
pub fn write_material_files(
    output_dir: &Path,
    stem: &str,
    group: &MaterialGroup,
    color: Rgba,
) -> Result<MaterialFiles> {
    let base = format!("{}-{}", stem, group.material.suffix());
    let mtl_name = format!("{}.mtl", base);
    let obj = output_dir.join(format!("{}.obj", base));
    let mtl = output_dir.join(&mtl_name);

    super::write_atomic(&mtl, &render_mtl(group.material, color))?;
    super::write_atomic(&obj, &render_material_obj(group, &mtl_name))?;

    Ok(MaterialFiles {
        material: group.material,
        obj,
        mtl,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Face, Mesh, Point3};
    use crate::io::FootprintHints;
    use crate::semantic::{classify, ClassifierConfig, MaterialPalette};
    use tempfile::TempDir;

    fn ground_group() -> MaterialGroup {
        let mesh = Mesh::from_geometry(
            vec![
                Point3::new(9.0, 9.0, 9.0),
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
            ],
            vec![Face::new(vec![1, 2, 3])],
        );
        let result = classify(&mesh, &FootprintHints::default(), &ClassifierConfig::default()).unwrap();
        let group = result
            .non_empty_groups()
            .next()
            .cloned()
            .unwrap();
        group
    }

    #[test]
    fn test_render_mtl() {
        let mtl = render_mtl(Material::Wall, MaterialPalette::default().wall);
        assert!(mtl.contains("newmtl Wall\n"));
        assert!(mtl.contains("Ka 0.000 0.000 0.000\n"));
        assert!(mtl.contains("Kd 0.831400 0.831400 0.847100\n"));
        assert!(mtl.contains("d 1.000000\n"));
        assert!(mtl.ends_with("illum 1\n"));
    }

    #[test]
    fn test_render_material_obj_uses_compact_indices() {
        let group = ground_group();
        let text = render_material_obj(&group, "b-ground.mtl");
        assert!(text.contains("mtllib b-ground.mtl\n"));
        assert!(text.contains(&format!("usemtl {}\n", group.material)));
        assert!(text.contains("f 1 2 3\n"));
        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 3);
        assert!(!text.contains("v 9.000000"));
    }

    #[test]
    fn test_write_material_files() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let group = ground_group();
        let files = write_material_files(dir.path(), "b", &group, Rgba::new(0.5, 0.5, 0.5, 1.0))?;

        let suffix = group.material.suffix();
        assert_eq!(files.obj, dir.path().join(format!("b-{}.obj", suffix)));
        assert!(files.obj.exists());
        assert!(std::fs::read_to_string(&files.mtl)?.contains("Kd 0.500000 0.500000 0.500000"));
        Ok(())
    }
}
