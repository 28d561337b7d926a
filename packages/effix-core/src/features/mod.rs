//! Feature modules - Each feature follows Hexagonal Architecture
//!
//! Each feature contains:
//! - domain/     - Pure business logic
//! - ports/      - Interface definitions (traits)
//! - application/ - Use cases
//! - infrastructure/ - External dependency implementations
//!
//! Dependency order, leaves first:
//! clause → heap_resolution → disjunct → equivalence → reward → cluster

pub mod clause;
pub mod heap_resolution;

pub mod disjunct;
pub mod equivalence;

pub mod reward;

pub mod cluster;
