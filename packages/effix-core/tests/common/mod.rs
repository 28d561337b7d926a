//! Common test utilities for effix-core
//!
//! Summary JSON builders shaped like the analyzer's output, plus the
//! fixtures shared by the scenario and property tests.

#![allow(dead_code)]

mod builders;
mod fixtures;

pub use builders::*;
pub use fixtures::*;
