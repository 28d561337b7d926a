//! Scenario fixtures
//!
//! The target bug throughout is a leak of `p` spanning lines 10-12.

use super::builders::*;
use effix_core::{BugDescriptor, BugType, PatchSignature, SummaryParser};

pub fn leak_bug() -> BugDescriptor {
    BugDescriptor::new(BugType::MemoryLeak, "make_node", "list.c", 10, 12)
}

/// `p` points to a non-null heap cell
fn with_p(builder: DisjunctBuilder) -> DisjunctBuilder {
    builder
        .stack("p", "v1")
        .deref("v1", "v2")
        .atom("NotEqual", linear_term(&[("v2", 1)], 0), const_term(0))
}

/// Leaks `p` at 10-12
pub fn leaking_disjunct() -> DisjunctBuilder {
    with_p(DisjunctBuilder::new("ErrorMemoryLeak", 10, 12))
        .allocated("v2")
        .trace(&[10, 11, 12])
}

/// Same span, `p` freed
pub fn freeing_disjunct() -> DisjunctBuilder {
    with_p(DisjunctBuilder::new("Ok", 10, 12))
        .allocated("v2")
        .freed("v2")
        .trace(&[10, 11, 12])
}

/// Same span, `p` still allocated but no leak reported
pub fn retaining_disjunct() -> DisjunctBuilder {
    with_p(DisjunctBuilder::new("Ok", 10, 12)).allocated("v2")
}

/// Early return of 0 when `n <= 0`
pub fn early_return_disjunct() -> DisjunctBuilder {
    DisjunctBuilder::new("Ok", 5, 30)
        .stack("return", "v7")
        .deref("v7", "v8")
        .stack("n", "v3")
        .deref("v3", "v4")
        .linear_eq("v8", &[], 0)
        .pruned("LessEqual", linear_term(&[("v4", 1)], 0), const_term(0))
        .atom("LessEqual", linear_term(&[("v4", 1)], 0), const_term(0))
}

/// Like [`early_return_disjunct`] but `p` is still held
pub fn retaining_return_disjunct() -> DisjunctBuilder {
    with_p(early_return_disjunct()).allocated("v2")
}

/// Null dereference at 40-41
pub fn invalid_access_disjunct() -> DisjunctBuilder {
    DisjunctBuilder::new("InvalidAccess", 40, 41)
        .stack("q", "v11")
        .deref("v11", "v12")
        .linear_eq("v12", &[], 0)
}

pub fn baseline_summary() -> String {
    SummaryBuilder::new()
        .with(leaking_disjunct())
        .with(early_return_disjunct())
        .build()
}

pub fn signature_of(summary: &str) -> PatchSignature {
    SummaryParser::default()
        .signature_from_str(summary)
        .expect("summary parses")
}

/// `p = 2 * v9` with `v9` unmapped; eliminating `v9` is not expressible
pub fn parity_disjunct() -> DisjunctBuilder {
    DisjunctBuilder::new("Ok", 50, 55)
        .stack("p", "v1")
        .deref("v1", "v2")
        .linear_eq("v2", &[("v9", 2)], 0)
}
