//! Cluster Manager
//!
//! Groups candidate patches by patch-signature equality and keeps the
//! reward verdict of each group for the patch generator.
//!
//! ## Architecture
//!
//! ```text
//! cluster
//! ├── domain/        # Cluster, PatchRecord, ClusterAssignment
//! └── application/   # ClusterManager (match-or-create, bookkeeping)
//! ```

pub mod application;
pub mod domain;

pub use application::ClusterManager;
pub use domain::{Cluster, ClusterAssignment, PatchRecord};
