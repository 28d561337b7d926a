//! Clause Language & Formula Pipeline
//!
//! A small term algebra for the analyzer's arithmetic/pointer facts and the
//! passes that turn raw clause lists into solver-ready formulas.
//!
//! ## Architecture
//!
//! ```text
//! clause
//! ├── domain/           # Clause terms, Formula
//! ├── ports/            # DecisionProcedure trait, verdicts, errors
//! ├── application/      # normalisation pipeline, FormulaOracle
//! └── infrastructure/   # LightweightSolver, Z3Solver (feature "z3")
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::{ClauseLists, FormulaCollection, FormulaOracle};
pub use domain::{Clause, ClauseError, Formula, LinearTerm, Operand, RelationKind};
pub use ports::{DecisionProcedure, EliminationError, OracleError, Verdict};
