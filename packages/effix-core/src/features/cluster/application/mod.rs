//! Cluster management use case

pub mod manager;

pub use manager::ClusterManager;
