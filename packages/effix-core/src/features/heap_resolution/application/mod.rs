//! Heap resolution use case
//!
//! ```text
//! SymbolicState
//!   1. heap entries        → HeapGraph (cycle edges marked)
//!   2. stack + stack attrs → root bindings
//!   3. roots × HeapGraph   → VariableMap (alias groups)
//!   4. attrs               → allocated / deallocated alias sets
//! ```

use crate::features::heap_resolution::domain::{AliasGroup, AliasSets, SymbolicState};
use crate::features::heap_resolution::infrastructure::{HeapGraph, VariableMap};

/// Resolution result for one state
#[derive(Debug, Clone, Default)]
pub struct ResolvedState {
    pub heap: HeapGraph,
    pub variables: VariableMap,
    /// Objects allocated and not explicitly freed
    pub allocated: AliasSets,
    pub deallocated: AliasSets,
}

impl ResolvedState {
    pub fn alias_groups(&self) -> Vec<AliasGroup> {
        self.variables.alias_groups()
    }

    /// Name used for `lvar` in clauses
    pub fn name_of(&self, lvar: &str) -> String {
        self.variables.display_name(lvar)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StateResolver;

impl StateResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(&self, state: &SymbolicState) -> ResolvedState {
        let heap = HeapGraph::build(&state.heap);

        let stack_roots = state
            .stack
            .iter()
            .map(|binding| (binding.pvar.as_str(), binding.lvar.as_str()));
        let attr_roots = state.attrs.iter().flat_map(|entry| {
            entry
                .stack_roots()
                .map(move |pvar| (pvar, entry.lvar.as_str()))
        });
        let variables = VariableMap::build(stack_roots.chain(attr_roots), &heap);

        let allocated = variables.to_alias_sets(
            state
                .attrs
                .iter()
                .filter(|entry| entry.is_allocated())
                .map(|entry| entry.lvar.as_str()),
        );
        let deallocated = variables.to_alias_sets(
            state
                .attrs
                .iter()
                .filter(|entry| entry.is_deallocated())
                .map(|entry| entry.lvar.as_str()),
        );

        tracing::trace!(
            "Resolved state: {} pvars, {} allocated, {} deallocated",
            variables.len(),
            allocated.len(),
            deallocated.len()
        );

        ResolvedState {
            heap,
            variables,
            allocated,
            deallocated,
        }
    }
}
