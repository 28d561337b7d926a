//! Signature domain models

pub mod signature;

pub use signature::{CheapKey, DisjunctSignature, PatchSignature};
