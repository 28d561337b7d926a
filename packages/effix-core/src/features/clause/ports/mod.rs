//! Clause Ports - Decision procedure boundary
//!
//! The rest of the crate never talks to a solver directly. It hands
//! [`Formula`] values to a [`DecisionProcedure`] through
//! [`FormulaOracle`](crate::features::clause::application::FormulaOracle),
//! which turns satisfiability verdicts into the three comparisons the
//! analysis needs.
//!
//! ## Implementors
//! - `LightweightSolver` (always available)
//! - `Z3Solver` (`--features z3`)

use crate::features::clause::domain::Formula;
use thiserror::Error;

/// Outcome of one satisfiability query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Sat,
    Unsat,
    /// Timeout, budget exhausted, or outside the supported theory
    Unknown,
}

/// Failure of a decision procedure itself
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    /// The backend failed or is unavailable
    #[error("{backend} failed: {message}")]
    Backend { backend: String, message: String },

    /// A query was inconclusive and the unknown-result policy is `error`
    #[error("{backend} returned unknown for: {query}")]
    Inconclusive { backend: String, query: String },
}

/// Failure of quantifier elimination
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EliminationError {
    /// The eliminated result cannot be expressed as a [`Formula`];
    /// callers substitute `True`
    #[error("Elimination result cannot be translated back: {0}")]
    Untranslatable(String),

    /// The backend itself failed; callers propagate
    #[error(transparent)]
    Backend(#[from] OracleError),
}

/// Decision procedure port
///
/// Implementations must be callable concurrently from several candidates
/// being classified at once, hence `&self` and `Send + Sync`.
pub trait DecisionProcedure: Send + Sync {
    /// Backend name for logs and errors
    fn name(&self) -> &'static str;

    /// Satisfiability of a quantifier-free or existential formula
    fn check_sat(&self, formula: &Formula) -> Result<Verdict, OracleError>;

    /// Return a quantifier-free formula equivalent to `∃ vars. formula`
    fn eliminate(&self, vars: &[String], formula: &Formula) -> Result<Formula, EliminationError>;
}
