// Graph stage: dependency graph construction and traversal

pub mod graph_builder;
pub mod graph_types;

pub use graph_builder::build_graph;
pub use graph_types::DependencyGraph;
