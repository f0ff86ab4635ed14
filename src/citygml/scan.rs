// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Marker-based scanning and rewriting of CityGML text
//!
//! Only the literal element shapes written by the upstream converter are
//! recognised. Spans are copied byte for byte so that whitespace and
//! attribute order survive the merge.

const MEMBER_START: &str = "<core:cityObjectMember>";
const MEMBER_END: &str = "</core:cityObjectMember>";
const BARE_MEMBER_START: &str = "<cityObjectMember>";
const BARE_MEMBER_END: &str = "</cityObjectMember>";

const ID_PLACEHOLDER: &str = "UUID";
const DESCRIPTION_PHRASE: &str = "created by converter";

/// Root element used when no input supplies one
pub const DEFAULT_ROOT_TAG: &str = concat!(
    r#"<core:CityModel xmlns:core="http://www.opengis.net/citygml/2.0""#,
    r#" xmlns:gml="http://www.opengis.net/gml""#,
    r#" xmlns:bldg="http://www.opengis.net/citygml/building/2.0""#,
    r#" xmlns:app="http://www.opengis.net/citygml/appearance/2.0""#,
    r#" xmlns:gen="http://www.opengis.net/citygml/generics/2.0""#,
    r#" xmlns:xlink="http://www.w3.org/1999/xlink""#,
    r#" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
);

/// Whether the text looks like a CityGML document at all
pub fn is_city_model(content: &str) -> bool {
    content.contains("CityModel")
}

/// Every `cityObjectMember` element in document order.
///
/// The `core:` form is used when present, the unprefixed form otherwise.
/// An unterminated member ends the scan.
pub fn extract_city_objects(content: &str) -> Vec<&str> {
    let (start_marker, end_marker) = if content.contains(MEMBER_START) {
        (MEMBER_START, MEMBER_END)
    } else {
        (BARE_MEMBER_START, BARE_MEMBER_END)
    };

    let mut objects = Vec::new();
    let mut pos = 0;
    while let Some(offset) = content[pos..].find(start_marker) {
        let start = pos + offset;
        let Some(len) = content[start..].find(end_marker) else {
            break;
        };
        let end = start + len + end_marker.len();
        objects.push(&content[start..end]);
        pos = end;
    }
    objects
}

/// Replace the `UUID_` placeholder prefix of identifiers and references with
/// `<name>_`
pub fn rewrite_identifiers(span: &str, name: &str) -> String {
    let prefixed = |lead: &str, with: &str| (format!("{lead}{ID_PLACEHOLDER}_"), format!("{lead}{with}_"));

    [
        prefixed("gml:id=\"", name),
        prefixed("id=\"", name),
        prefixed("xlink:href=\"#", name),
        prefixed("\"", name),
    ]
    .iter()
    .fold(span.to_string(), |text, (from, to)| text.replace(from, to))
}

/// Credit `author` in generated descriptions
pub fn rewrite_descriptions(span: &str, author: &str) -> String {
    span.replace(DESCRIPTION_PHRASE, &format!("created by {}", author))
}

/// Opening tag of the document element, if it names a `CityModel`.
///
/// The XML declaration, processing instructions, comments and DOCTYPE are
/// skipped. A self-closing root such as `<core:CityModel/>` is returned as
/// an opening tag so members can follow it.
pub fn root_tag(content: &str) -> Option<String> {
    let mut pos = 0;
    loop {
        let start = pos + content[pos..].find('<')?;
        let rest = &content[start..];
        let terminator = if rest.starts_with("<?") {
            "?>"
        } else if rest.starts_with("<!--") {
            "-->"
        } else if rest.starts_with("<!") {
            ">"
        } else {
            let end = start + rest.find('>')? + 1;
            let tag = &content[start..end];
            return is_city_model(tag).then(|| open_form(tag));
        };
        pos = start + rest.find(terminator)? + terminator.len();
    }
}

fn open_form(tag: &str) -> String {
    match tag.strip_suffix("/>") {
        Some(head) => format!("{}>", head.trim_end()),
        None => tag.to_string(),
    }
}

/// Closing tag matching an opening tag, e.g. `</core:CityModel>`
pub fn closing_tag(open_tag: &str) -> String {
    let name: String = open_tag
        .trim_start_matches('<')
        .chars()
        .take_while(|c| !c.is_whitespace() && *c != '>' && *c != '/')
        .collect();
    format!("</{}>", name)
}
