// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! OBJ reader and writer that keep every non-vertex line intact

use crate::error::{PipelineError, Result};
use crate::geometry::{Face, Mesh, ObjLine};
use log::debug;
use nalgebra::Point3;
use std::fmt::Write as _;
use std::path::Path;

/// Face line waiting for index validation once all vertices are known
struct PendingFace {
    line: usize,
    indices: Option<Vec<i64>>,
}

/// Read and parse an OBJ file
pub fn read_obj(path: &Path) -> Result<Mesh> {
    let source = super::read_text(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(parse_obj(&source, &name))
}

/// Parse OBJ text.
///
/// Malformed vertex lines and faces with an unresolvable index are skipped
/// (counted in `malformed_lines`) but their text is still kept verbatim.
/// Only the vertex part of compound `v/vt/vn` face indices is used.
pub fn parse_obj(source: &str, name: &str) -> Mesh {
    let mut mesh = Mesh::new();
    let mut pending = Vec::new();

    for (line_no, line) in split_lines(source).enumerate() {
        let line_no = line_no + 1;
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some("v") => match parse_vertex(tokens) {
                Some(vertex) => {
                    mesh.lines.push(ObjLine::Vertex(mesh.vertices.len()));
                    mesh.vertices.push(vertex);
                }
                None => {
                    skip(&mut mesh, name, line_no, "invalid vertex");
                    mesh.lines.push(ObjLine::Verbatim(line.to_string()));
                }
            },
            Some("f") => {
                pending.push(PendingFace {
                    line: line_no,
                    indices: parse_face_indices(tokens, mesh.vertices.len()),
                });
                mesh.lines.push(ObjLine::Verbatim(line.to_string()));
            }
            _ => mesh.lines.push(ObjLine::Verbatim(line.to_string())),
        }
    }

    let vertex_count = mesh.vertices.len() as i64;
    for face in pending {
        let resolved = face.indices.filter(|indices| {
            indices.len() >= 3 && indices.iter().all(|&i| i >= 0 && i < vertex_count)
        });
        match resolved {
            Some(indices) => mesh
                .faces
                .push(Face::new(indices.into_iter().map(|i| i as usize).collect())),
            None => skip(&mut mesh, name, face.line, "invalid face"),
        }
    }

    mesh
}

/// Serialize the mesh back to OBJ, replacing only vertex lines
pub fn render_obj(mesh: &Mesh) -> String {
    let mut out = String::new();
    for line in mesh.lines() {
        match line {
            ObjLine::Vertex(index) => {
                let v = &mesh.vertices[*index];
                let _ = writeln!(out, "v {:.6} {:.6} {:.6}", v.x, v.y, v.z);
            }
            ObjLine::Verbatim(text) => {
                out.push_str(text);
                out.push('\n');
            }
        }
    }
    out
}

/// Write the mesh as OBJ, atomically
pub fn write_obj(mesh: &Mesh, path: &Path) -> Result<()> {
    super::write_atomic(path, &render_obj(mesh))
}

/// Lines split on `\n` only, so a trailing `\r` survives a round trip
fn split_lines(source: &str) -> impl Iterator<Item = &str> {
    let body = source.strip_suffix('\n').unwrap_or(source);
    let empty = source.is_empty();
    body.split('\n').filter(move |_| !empty)
}

fn parse_vertex<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Option<Point3<f64>> {
    let x = tokens.next()?.parse().ok()?;
    let y = tokens.next()?.parse().ok()?;
    let z = tokens.next()?.parse().ok()?;
    Some(Point3::new(x, y, z))
}

/// Resolve face tokens to 0-based indices. Negative OBJ indices count back
/// from the vertices seen so far; index 0 is never valid.
fn parse_face_indices<'a>(
    tokens: impl Iterator<Item = &'a str>,
    seen_vertices: usize,
) -> Option<Vec<i64>> {
    tokens
        .map(|token| {
            let raw: i64 = token.split('/').next()?.parse().ok()?;
            match raw {
                0 => None,
                r if r > 0 => Some(r - 1),
                r => Some(seen_vertices as i64 + r),
            }
        })
        .collect()
}

fn skip(mesh: &mut Mesh, name: &str, line: usize, message: &str) {
    mesh.malformed_lines += 1;
    let err = PipelineError::Parse {
        file: name.to_string(),
        line,
        message: message.to_string(),
    };
    debug!("Skipping line: {}", err);
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUBE_TOP: &str = "# exported\nmtllib a.mtl\nv 0 0 1\nv 1 0 1\nv 1 1 1\nvt 0 0\nusemtl roof\nf 1/1 2/1 3/1\n";

    #[test]
    fn test_parse_keeps_source_lines() {
        let mesh = parse_obj(CUBE_TOP, "top.obj");
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.faces[0].indices, vec![0, 1, 2]);
        let verbatim: Vec<&str> = mesh.verbatim_lines().collect();
        assert_eq!(
            verbatim,
            vec!["# exported", "mtllib a.mtl", "vt 0 0", "usemtl roof", "f 1/1 2/1 3/1"]
        );
    }

    #[test]
    fn test_render_formats_vertices() {
        let mut mesh = parse_obj(CUBE_TOP, "top.obj");
        mesh.translate_z(0.5);
        let out = render_obj(&mesh);
        assert!(out.contains("v 1.000000 1.000000 1.500000\n"));
        assert!(out.starts_with("# exported\nmtllib a.mtl\nv 0.000000 0.000000 1.500000\n"));
        assert!(out.ends_with("f 1/1 2/1 3/1\n"));
    }

    #[test]
    fn test_invalid_lines_are_skipped() {
        let src = "v 0 0 0\nv 1 0 0\nv a b c\nv 0 1 0\nf 1 2 9\nf 1 2\nf 1 2 3\nf -3 -2 -1\n";
        let mesh = parse_obj(src, "bad.obj");
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.faces.len(), 2);
        assert_eq!(mesh.faces[1].indices, vec![0, 1, 2]);
        assert_eq!(mesh.malformed_lines, 3);
        // The broken vertex line is reproduced untouched
        assert!(render_obj(&mesh).contains("v a b c\n"));
    }

    #[test]
    fn test_crlf_survives() {
        let src = "# c\r\nv 0 0 0\r\n";
        let mesh = parse_obj(src, "crlf.obj");
        assert_eq!(mesh.vertex_count(), 1);
        assert!(render_obj(&mesh).starts_with("# c\r\n"));
    }

    #[test]
    fn test_empty_source() {
        let mesh = parse_obj("", "empty.obj");
        assert_eq!(mesh.vertex_count(), 0);
        assert!(mesh.lines().is_empty());
    }
}
