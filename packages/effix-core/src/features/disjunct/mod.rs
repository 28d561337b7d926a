//! Disjunct Parsing
//!
//! Turns one branch of an analyzer summary into a [`DisjunctSignature`]
//! by driving heap resolution and the clause pipeline together.
//!
//! ## Architecture
//!
//! ```text
//! disjunct
//! ├── domain/        # DisjunctLabel, LabelKind, raw summary model
//! └── application/   # DisjunctParser, SummaryParser
//! ```
//!
//! [`DisjunctSignature`]: crate::features::equivalence::DisjunctSignature

pub mod application;
pub mod domain;

pub use application::{DisjunctParser, SummaryParser};
pub use domain::{DisjunctLabel, LabelKind, RawDisjunct};
