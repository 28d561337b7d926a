//! Heap & Variable Resolution
//!
//! Reconstructs, from one symbolic post-state, the heap graph, the
//! program-variable ↔ logical-variable alias map, and the allocated /
//! deallocated objects named by their alias groups.
//!
//! ## Architecture
//!
//! ```text
//! heap_resolution
//! ├── domain/           # SymbolicState, Attribute, EdgeLabel, AliasGroup
//! ├── infrastructure/   # HeapGraph (petgraph), VariableMap
//! └── application/      # StateResolver → ResolvedState
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{ResolvedState, StateResolver};
pub use domain::{
    AliasGroup, AliasSets, Attribute, AttributeEntry, EdgeLabel, HeapEntry, StackBinding,
    SymbolicState,
};
pub use infrastructure::{HeapGraph, VariableMap};
