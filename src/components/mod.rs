//! UI components exported by the crate.

pub mod network_graph;
