//! Disjunct parsing use cases

pub mod parser;

pub use parser::{clause_lists, parse_summary_str, read_summary, DisjunctParser, SummaryParser};
