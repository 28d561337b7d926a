//! Heap resolution infrastructure
//!
//! - [`heap_graph`]: petgraph heap graph with SCC-based cycle-edge marking
//! - [`variable_map`]: root expansion and alias-group inversion

pub mod heap_graph;
pub mod variable_map;

pub use heap_graph::HeapGraph;
pub use variable_map::VariableMap;
