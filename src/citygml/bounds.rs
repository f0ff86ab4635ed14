// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Envelope extraction and union

use crate::geometry::BoundingBox;
use nalgebra::Point3;
use serde::Serialize;

/// Envelope of a CityGML document with its spatial reference system
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bounds {
    pub bbox: BoundingBox,
    /// Empty when the document names no SRS
    pub srs: String,
}

impl Bounds {
    pub fn new(lower: Point3<f64>, upper: Point3<f64>, srs: impl Into<String>) -> Self {
        Self {
            bbox: BoundingBox::new(lower, upper),
            srs: srs.into(),
        }
    }

    pub fn lower(&self) -> Point3<f64> {
        self.bbox.min
    }

    pub fn upper(&self) -> Point3<f64> {
        self.bbox.max
    }
}

/// First `gml:lowerCorner`/`gml:upperCorner` pair and the first `srsName`
/// of a document. Both corners need three numeric fields.
pub fn extract_bounds(content: &str) -> Option<Bounds> {
    let lower = corner(content, "gml:lowerCorner")?;
    let upper = corner(content, "gml:upperCorner")?;
    let srs = attribute(content, "srsName").unwrap_or_default();
    Some(Bounds::new(lower, upper, srs))
}

/// Lower corners folded by minimum, upper corners by maximum. The SRS is the
/// first non-empty one in input order.
pub fn merge_bounds<'a>(all: impl IntoIterator<Item = &'a Bounds>) -> Option<Bounds> {
    all.into_iter().fold(None, |merged: Option<Bounds>, b| {
        Some(match merged {
            None => b.clone(),
            Some(m) => {
                let srs = if m.srs.is_empty() { b.srs.clone() } else { m.srs };
                Bounds {
                    bbox: m.bbox.union(&b.bbox),
                    srs,
                }
            }
        })
    })
}

fn corner(content: &str, tag: &str) -> Option<Point3<f64>> {
    let open = format!("<{}", tag);
    let close = format!("</{}>", tag);

    let start = content.find(&open)?;
    let body_start = start + content[start..].find('>')? + 1;
    let body_end = body_start + content[body_start..].find(&close)?;

    let fields: Vec<f64> = content[body_start..body_end]
        .split_whitespace()
        .take(3)
        .map(|f| f.parse().ok())
        .collect::<Option<_>>()?;
    match fields[..] {
        [x, y, z] => Some(Point3::new(x, y, z)),
        _ => None,
    }
}

/// First non-empty value of `name="..."`
fn attribute<'a>(content: &'a str, name: &str) -> Option<&'a str> {
    let marker = format!("{}=\"", name);
    let mut rest = content;
    loop {
        let start = rest.find(&marker)? + marker.len();
        let len = rest[start..].find('"')?;
        if len > 0 {
            return Some(&rest[start..start + len]);
        }
        rest = &rest[start + 1..];
    }
}
