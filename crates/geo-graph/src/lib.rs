//! Graph stage of the location pipeline.
//!
//! Turns the geocoded table into an undirected attributed graph
//! ([`graph::LocationGraph`]) where locations sharing a place type are
//! connected, and writes it as GraphML for external visualization tools.

pub mod builder;
pub mod export;
pub mod graph;

pub use builder::{BuildError, build_and_save_graph, build_graph};
pub use export::{to_graphml, write_graphml};
pub use graph::{EdgeRelation, GraphStats, LocationEdge, LocationGraph, LocationNode};
