//! Disjunct domain models

pub mod label;
pub mod summary;

pub use label::{DisjunctLabel, LabelKind};
pub use summary::{
    decode_rational, Atom, IntLike, LinArith, LinearEquation, PathCondition, RawContent,
    RawDisjunct, RawLabel, RawPathCondition, RawState, Term,
};
