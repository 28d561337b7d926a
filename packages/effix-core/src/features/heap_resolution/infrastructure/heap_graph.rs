//! Heap graph with petgraph
//!
//! Directed multigraph over logical variables:
//! - Nodes are lvars
//! - Edges are dereference or field links (`parent --label--> child`)
//!
//! Tarjan SCC marks every edge whose endpoints share a strongly connected
//! component (self-loops included). Those are exactly the edges lying on
//! some simple cycle; expansion skips them, which leaves an acyclic graph.

use crate::features::heap_resolution::domain::{EdgeLabel, HeapEntry};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{BTreeSet, HashMap, HashSet};

#[derive(Debug, Clone, Default)]
pub struct HeapGraph {
    graph: DiGraph<String, EdgeLabel>,

    /// lvar → node index
    lvar_to_node: HashMap<String, NodeIndex>,

    /// Edges lying on a cycle
    cycle_edges: HashSet<EdgeIndex>,
}

impl HeapGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from heap entries, edges kept in input order
    pub fn build(entries: &[HeapEntry]) -> Self {
        let mut heap = Self::new();
        for entry in entries {
            for (label, child) in &entry.edges {
                heap.insert_edge(&entry.parent, label.clone(), child);
            }
        }
        heap.mark_cycle_edges();
        heap
    }

    fn node(&mut self, lvar: &str) -> NodeIndex {
        if let Some(&idx) = self.lvar_to_node.get(lvar) {
            return idx;
        }
        let idx = self.graph.add_node(lvar.to_string());
        self.lvar_to_node.insert(lvar.to_string(), idx);
        idx
    }

    fn insert_edge(&mut self, parent: &str, label: EdgeLabel, child: &str) {
        let from = self.node(parent);
        let to = self.node(child);
        self.graph.add_edge(from, to, label);
    }

    fn mark_cycle_edges(&mut self) {
        let mut component: HashMap<NodeIndex, usize> = HashMap::new();
        for (id, scc) in tarjan_scc(&self.graph).into_iter().enumerate() {
            for idx in scc {
                component.insert(idx, id);
            }
        }

        self.cycle_edges = self
            .graph
            .edge_references()
            .filter(|e| component.get(&e.source()) == component.get(&e.target()))
            .map(|e| e.id())
            .collect();

        if !self.cycle_edges.is_empty() {
            tracing::debug!(
                "Heap graph has {} edges on cycles (skipped during expansion)",
                self.cycle_edges.len()
            );
        }
    }

    /// Outgoing edges of `lvar` in insertion order
    fn outgoing(&self, lvar: &str) -> Vec<(EdgeIndex, &EdgeLabel, &str)> {
        let Some(&idx) = self.lvar_to_node.get(lvar) else {
            return Vec::new();
        };
        let mut edges: Vec<_> = self
            .graph
            .edges(idx)
            .map(|e| (e.id(), e.weight(), self.graph[e.target()].as_str()))
            .collect();
        edges.sort_by_key(|(id, _, _)| *id);
        edges
    }

    pub fn has_children(&self, lvar: &str) -> bool {
        !self.outgoing(lvar).is_empty()
    }

    pub fn children(&self, lvar: &str) -> Vec<(&EdgeLabel, &str)> {
        self.outgoing(lvar)
            .into_iter()
            .map(|(_, label, child)| (label, child))
            .collect()
    }

    /// Children reachable through edges not lying on any cycle
    pub fn children_outside_cycles(&self, lvar: &str) -> Vec<(&EdgeLabel, &str)> {
        self.outgoing(lvar)
            .into_iter()
            .filter(|(id, _, _)| !self.cycle_edges.contains(id))
            .map(|(_, label, child)| (label, child))
            .collect()
    }

    pub fn has_cycle(&self) -> bool {
        !self.cycle_edges.is_empty()
    }

    /// `(parent, label, child)` for every edge on a cycle
    pub fn cycle_edges(&self) -> BTreeSet<(String, EdgeLabel, String)> {
        self.cycle_edges
            .iter()
            .filter_map(|&id| {
                let (from, to) = self.graph.edge_endpoints(id)?;
                Some((
                    self.graph[from].clone(),
                    self.graph[id].clone(),
                    self.graph[to].clone(),
                ))
            })
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
