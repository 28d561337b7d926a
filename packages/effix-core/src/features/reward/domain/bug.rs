//! Target bug descriptors

use crate::features::disjunct::domain::{DisjunctLabel, LabelKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bug type as named in the analyzer's whole-program report
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BugType {
    MemoryLeak,
    NullDereference,
    UseAfterFree,
    Other(String),
}

impl BugType {
    pub fn as_str(&self) -> &str {
        match self {
            BugType::MemoryLeak => "MEMORY_LEAK_C",
            BugType::NullDereference => "NULLPTR_DEREFERENCE",
            BugType::UseAfterFree => "USE_AFTER_FREE",
            BugType::Other(name) => name,
        }
    }

    /// Whether a disjunct labelled `kind` can exhibit this bug
    ///
    /// Single-procedure disjuncts use a different vocabulary from the
    /// whole-program report.
    pub fn matches(&self, kind: &LabelKind) -> bool {
        match self {
            BugType::MemoryLeak => *kind == LabelKind::ErrorMemoryLeak,
            BugType::NullDereference => {
                matches!(kind, LabelKind::InvalidAccess | LabelKind::AbortProgram)
            }
            BugType::UseAfterFree => *kind == LabelKind::InvalidAccess,
            BugType::Other(_) => false,
        }
    }
}

impl From<String> for BugType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "MEMORY_LEAK_C" => BugType::MemoryLeak,
            "NULLPTR_DEREFERENCE" => BugType::NullDereference,
            "USE_AFTER_FREE" => BugType::UseAfterFree,
            _ => BugType::Other(name),
        }
    }
}

impl From<BugType> for String {
    fn from(bug_type: BugType) -> Self {
        bug_type.as_str().to_string()
    }
}

impl fmt::Display for BugType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One reported bug, identified by its trace span
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BugDescriptor {
    pub bug_type: BugType,
    pub procedure: String,
    pub file: String,
    /// First line of the bug trace, -1 when the trace is empty
    pub start_line: i64,
    /// Last line of the bug trace, -1 when the trace is empty
    pub end_line: i64,
    /// Where the bug was reported; moves once a patch is applied
    #[serde(default)]
    pub line: i64,
    #[serde(default)]
    pub column: i64,
    /// `file|procedure|bug_type`
    #[serde(default)]
    pub key: String,
}

impl BugDescriptor {
    pub fn new(
        bug_type: BugType,
        procedure: impl Into<String>,
        file: impl Into<String>,
        start_line: i64,
        end_line: i64,
    ) -> Self {
        Self {
            bug_type,
            procedure: procedure.into(),
            file: file.into(),
            start_line,
            end_line,
            line: start_line,
            column: 0,
            key: String::new(),
        }
    }

    /// Whether a disjunct with `label` exhibits this bug
    pub fn is_shown_by(&self, label: &DisjunctLabel) -> bool {
        self.bug_type.matches(&label.kind())
            && label.start_line == self.start_line
            && label.end_line == self.end_line
    }
}

impl fmt::Display for BugDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}, {}",
            self.bug_type, self.file, self.procedure, self.start_line, self.end_line
        )
    }
}
