//! Reward classification use case

pub mod classifier;

pub use classifier::{remove_similar_disjuncts, Comparison, RewardClassifier};
