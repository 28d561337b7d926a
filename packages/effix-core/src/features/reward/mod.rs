//! Reward Classification Engine
//!
//! Compares a candidate's patch signature against the baseline (the
//! original procedure's signature) and grades two axes:
//! - **pe** (elimination progress): is the target bug gone without a new
//!   one, and is the observable behaviour otherwise kept?
//! - **ppie** (path-independent improvement): did the buggy branch change
//!   while every other branch stayed put?
//!
//! ## Architecture
//!
//! ```text
//! reward
//! ├── domain/           # RewardLevel, RewardVerdict, BugDescriptor
//! ├── application/      # RewardClassifier
//! └── infrastructure/   # analyzer report ingestion
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::RewardClassifier;
pub use domain::{BugDescriptor, BugType, RewardError, RewardLevel, RewardVerdict};
pub use infrastructure::{parse_report_str, read_report};
