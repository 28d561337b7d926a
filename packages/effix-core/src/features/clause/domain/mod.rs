//! Clause language domain models

pub mod formula;
pub mod term;

pub use formula::Formula;
pub use term::{
    is_logical_var, is_restricted_var, Clause, LinearTerm, Operand, RelationKind,
};

use thiserror::Error;

/// Errors raised while building clause terms
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClauseError {
    /// A linear sum needs at least one summand
    #[error("Cannot build a linear sum from zero terms")]
    EmptyLinearSum,
}
