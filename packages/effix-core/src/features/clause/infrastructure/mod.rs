//! Decision procedure implementations
//!
//! 1. **LightweightSolver**: built-in linear integer arithmetic
//! 2. **Z3Solver**: full SMT solver (optional, feature-gated)

pub mod lightweight;
pub mod linear;

#[cfg(feature = "z3")]
pub mod z3_backend;

pub use lightweight::LightweightSolver;
pub use linear::{Constraint, LinExpr, LinearError, Rel};

#[cfg(feature = "z3")]
pub use z3_backend::Z3Solver;
