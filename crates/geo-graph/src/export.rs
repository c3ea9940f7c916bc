//! Export the location graph as GraphML.
//!
//! Node attributes: latitude, longitude, type, title, size.
//! Edge attributes: type, weight.

use crate::graph::LocationGraph;
use std::fmt::Write;
use std::fs;
use std::path::Path;

const GRAPHML_NS: &str = "http://graphml.graphdrawing.org/xmlns";
const GRAPHML_SCHEMA: &str = "http://graphml.graphdrawing.org/xmlns/1.0/graphml.xsd";

/// (key id, domain, attribute name, attribute type)
const KEYS: [(&str, &str, &str, &str); 7] = [
    ("d0", "node", "latitude", "double"),
    ("d1", "node", "longitude", "double"),
    ("d2", "node", "type", "string"),
    ("d3", "node", "title", "string"),
    ("d4", "node", "size", "long"),
    ("d5", "edge", "type", "string"),
    ("d6", "edge", "weight", "long"),
];

/// Render the graph as a GraphML document.
pub fn to_graphml(graph: &LocationGraph) -> String {
    let mut out = String::new();
    writeln!(out, "<?xml version='1.0' encoding='utf-8'?>").unwrap();
    writeln!(
        out,
        "<graphml xmlns=\"{ns}\" xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" \
         xsi:schemaLocation=\"{ns} {schema}\">",
        ns = GRAPHML_NS,
        schema = GRAPHML_SCHEMA
    )
    .unwrap();

    for (id, domain, name, ty) in KEYS {
        writeln!(
            out,
            "  <key id=\"{}\" for=\"{}\" attr.name=\"{}\" attr.type=\"{}\" />",
            id, domain, name, ty
        )
        .unwrap();
    }

    writeln!(out, "  <graph edgedefault=\"undirected\">").unwrap();

    for node in graph.nodes() {
        writeln!(out, "    <node id=\"{}\">", escape_xml(&node.id)).unwrap();
        write_data(&mut out, "d0", &format!("{:?}", node.latitude));
        write_data(&mut out, "d1", &format!("{:?}", node.longitude));
        if let Some(kind) = &node.kind {
            write_data(&mut out, "d2", kind);
        }
        write_data(&mut out, "d3", &node.title);
        write_data(&mut out, "d4", &node.size.to_string());
        writeln!(out, "    </node>").unwrap();
    }

    for edge in graph.edges() {
        writeln!(
            out,
            "    <edge source=\"{}\" target=\"{}\">",
            escape_xml(&edge.source),
            escape_xml(&edge.target)
        )
        .unwrap();
        write_data(&mut out, "d5", edge.relation.type_name());
        write_data(&mut out, "d6", &edge.relation.weight().to_string());
        writeln!(out, "    </edge>").unwrap();
    }

    writeln!(out, "  </graph>").unwrap();
    writeln!(out, "</graphml>").unwrap();
    out
}

fn write_data(out: &mut String, key: &str, value: &str) {
    writeln!(
        out,
        "      <data key=\"{}\">{}</data>",
        key,
        escape_xml(value)
    )
    .unwrap();
}

/// Escape the five XML special characters.
fn escape_xml(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Write the GraphML document to `path`, creating parent directories if needed.
pub fn write_graphml(graph: &LocationGraph, path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, to_graphml(graph))
}
