//! Build the location graph from the geocoded table.

use crate::export;
use crate::graph::{EdgeRelation, LocationGraph, LocationNode};
use geo_core::record::LocationRecord;
use geo_core::table::{self, TableError};
use std::path::{Path, PathBuf};

/// Errors from a graph builder run.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("failed to write graph to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Build the graph from location records.
///
/// 1. Records missing either coordinate are dropped.
/// 2. One node per remaining record, keyed by name (later rows overwrite).
/// 3. Every distinct pair of nodes sharing a non-missing type is connected.
/// 4. If that leaves ≥ 2 nodes and no edges, the first two nodes are joined
///    by an arbitrary connection.
pub fn build_graph<'a, I>(records: I) -> LocationGraph
where
    I: IntoIterator<Item = &'a LocationRecord>,
{
    let mut graph = LocationGraph::new();

    for record in records {
        let Some((latitude, longitude)) = record.coordinates() else {
            tracing::debug!("skipping {} (missing coordinates)", record.location);
            continue;
        };
        graph.upsert_node(LocationNode::new(
            record.location.clone(),
            latitude,
            longitude,
            record.kind.clone(),
        ));
    }

    let pairs: Vec<(String, String, String)> = graph
        .nodes_by_type()
        .into_iter()
        .filter(|(_, ids)| ids.len() > 1)
        .flat_map(|(kind, ids)| {
            let mut pairs = Vec::new();
            for (i, a) in ids.iter().enumerate() {
                for b in &ids[i + 1..] {
                    pairs.push((kind.to_string(), a.to_string(), b.to_string()));
                }
            }
            pairs
        })
        .collect();
    for (kind, a, b) in pairs {
        graph.add_edge(&a, &b, EdgeRelation::SameType(kind));
    }

    if graph.node_count() > 1 && graph.edge_count() == 0 {
        let first = graph.nodes()[0].id.clone();
        let second = graph.nodes()[1].id.clone();
        tracing::debug!("no shared types; linking {} and {}", first, second);
        graph.add_edge(&first, &second, EdgeRelation::Arbitrary);
    }

    graph
}

/// Read `csv_path`, build the graph, and write it as GraphML to `graph_path`.
pub fn build_and_save_graph(csv_path: &Path, graph_path: &Path) -> Result<LocationGraph, BuildError> {
    let table = table::load(csv_path)?;
    let graph = build_graph(&table);

    export::write_graphml(&graph, graph_path).map_err(|source| BuildError::Io {
        path: graph_path.to_path_buf(),
        source,
    })?;

    tracing::info!(
        "Successfully saved graph to {} ({} nodes, {} edges)",
        graph_path.display(),
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}
