/*
 * effix-core - Semantic core of a memory-safety program-repair tool
 *
 * Feature-First Hexagonal Architecture:
 * - features/ : Vertical slices (clause → heap_resolution → disjunct
 *               → equivalence → reward → cluster)
 * - config/   : Versioned YAML configuration
 * - errors    : Crate-level error type
 *
 * Equivalence and implication between formulas are decided by a pluggable
 * decision procedure (pure-Rust by default, Z3 behind the `z3` feature).
 */

#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::module_inception)] // Module naming intentional

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Feature modules
pub mod features;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::EffixConfig;
pub use errors::{EffixError, Result};
pub use features::clause::{Clause, Formula, FormulaOracle};
pub use features::cluster::{ClusterAssignment, ClusterManager, PatchRecord};
pub use features::disjunct::{DisjunctLabel, DisjunctParser, SummaryParser};
pub use features::equivalence::{DisjunctSignature, PatchSignature};
pub use features::reward::{BugDescriptor, BugType, RewardClassifier, RewardLevel, RewardVerdict};
