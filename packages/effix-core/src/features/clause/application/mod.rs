//! Clause application layer
//!
//! - [`pipeline`]: clause normalisation passes and formula realisation
//! - [`oracle`]: equivalence / implication queries over realised formulas

pub mod oracle;
pub mod pipeline;

pub use oracle::FormulaOracle;
pub use pipeline::{
    eliminate_logical_vars, inject_aliasing, remove_redundant_pointer_clauses,
    rewrite_restricted_vars, separate_return_clauses, ClauseLists, FormulaCollection,
};
