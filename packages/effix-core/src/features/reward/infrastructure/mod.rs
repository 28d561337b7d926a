//! Report ingestion

pub mod report;

pub use report::{parse_report_str, read_report};
