//! Whole-program bug report ingestion
//!
//! The report is a JSON array of bug objects; only the fields below are
//! read. Start and end lines come from the first and last bug-trace frame.

use crate::errors::{EffixError, Result};
use crate::features::disjunct::domain::IntLike;
use crate::features::reward::domain::{BugDescriptor, BugType};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RawFrame {
    line_number: IntLike,
}

#[derive(Debug, Deserialize)]
struct RawBug {
    bug_type: String,
    line: IntLike,
    column: IntLike,
    procedure: String,
    file: String,
    #[serde(default)]
    key: String,
    #[serde(default)]
    bug_trace: Vec<RawFrame>,
}

fn number(value: &IntLike, field: &str) -> Result<i64> {
    value
        .value()
        .ok_or_else(|| EffixError::parse_error(format!("Bad '{}' value {:?} in report", field, value)))
}

impl RawBug {
    fn into_descriptor(self) -> Result<BugDescriptor> {
        let (start_line, end_line) = match (self.bug_trace.first(), self.bug_trace.last()) {
            (Some(first), Some(last)) => (
                number(&first.line_number, "line_number")?,
                number(&last.line_number, "line_number")?,
            ),
            _ => (-1, -1),
        };
        Ok(BugDescriptor {
            bug_type: BugType::from(self.bug_type),
            line: number(&self.line, "line")?,
            column: number(&self.column, "column")?,
            procedure: self.procedure,
            file: self.file,
            key: self.key,
            start_line,
            end_line,
        })
    }
}

pub fn parse_report_str(text: &str) -> Result<Vec<BugDescriptor>> {
    let raw: Vec<RawBug> = serde_json::from_str(text)?;
    raw.into_iter().map(RawBug::into_descriptor).collect()
}

pub fn read_report(path: impl AsRef<Path>) -> Result<Vec<BugDescriptor>> {
    let text = std::fs::read_to_string(path.as_ref())?;
    let bugs = parse_report_str(&text)?;
    tracing::debug!("Read {} bugs from {}", bugs.len(), path.as_ref().display());
    Ok(bugs)
}
