// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Merged document assembly

use super::bounds::Bounds;
use super::scan::closing_tag;
use std::fmt::Write as _;

/// Everything that goes into one merged CityGML file
#[derive(Debug, Clone, PartialEq)]
pub struct MergedDocument {
    /// Opening tag of the document element
    pub root_tag: String,
    pub name: String,
    pub author: String,
    pub bounds: Option<Bounds>,
    /// Rewritten `cityObjectMember` spans in file, then extraction, order
    pub city_objects: Vec<String>,
    pub source_files: usize,
    /// Provenance timestamp, already formatted
    pub generated: String,
}

/// Serialize a merged document.
///
/// City objects are re-indented by two spaces and blank lines inside them
/// are dropped; their content is otherwise untouched.
pub fn assemble(doc: &MergedDocument) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<!-- Merged CityGML File -->\n");
    let _ = writeln!(
        out,
        "<!-- Generated by cityforge v{} on {} -->",
        env!("CARGO_PKG_VERSION"),
        doc.generated
    );
    let _ = writeln!(
        out,
        "<!-- {} source files merged, {} city objects -->",
        doc.source_files,
        doc.city_objects.len()
    );
    let _ = writeln!(out, "<!-- UUID_ prefixes replaced with {}_ -->", doc.name);
    let _ = writeln!(out, "<!-- Descriptions updated with author name: {} -->", doc.author);

    out.push_str(&doc.root_tag);
    out.push('\n');
    let _ = writeln!(out, "  <gml:name>{}</gml:name>", doc.name);

    if let Some(bounds) = &doc.bounds {
        let (lo, hi) = (bounds.lower(), bounds.upper());
        out.push_str("  <gml:boundedBy>\n");
        let _ = writeln!(
            out,
            "    <gml:Envelope srsName=\"{}\" srsDimension=\"3\">",
            bounds.srs
        );
        let _ = writeln!(
            out,
            "      <gml:lowerCorner>{:.6} {:.6} {:.6}</gml:lowerCorner>",
            lo.x, lo.y, lo.z
        );
        let _ = writeln!(
            out,
            "      <gml:upperCorner>{:.6} {:.6} {:.6}</gml:upperCorner>",
            hi.x, hi.y, hi.z
        );
        out.push_str("    </gml:Envelope>\n");
        out.push_str("  </gml:boundedBy>\n");
    }

    for object in &doc.city_objects {
        for line in object.lines().filter(|l| !l.trim().is_empty()) {
            out.push_str("  ");
            out.push_str(line);
            out.push('\n');
        }
    }

    out.push_str(&closing_tag(&doc.root_tag));
    out.push('\n');
    out
}
