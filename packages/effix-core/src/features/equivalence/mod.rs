//! Signature Equivalence & Merging
//!
//! ## Architecture
//!
//! ```text
//! equivalence
//! └── domain/    # DisjunctSignature, PatchSignature
//!
//! DisjunctSignature ── mergeable / merge ──► PatchSignature::absorb
//! PatchSignature ── equal (cheap keys, then perfect matching) ──► bool
//! ```
//!
//! Formula comparisons go through [`FormulaOracle`](crate::features::clause::FormulaOracle).

pub mod domain;

pub use domain::{DisjunctSignature, PatchSignature};
