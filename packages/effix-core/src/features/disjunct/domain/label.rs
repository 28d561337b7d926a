//! Disjunct labels
//!
//! The analyzer tags every branch with an outcome text and the source-line
//! span that produced it. Texts are kept verbatim; [`LabelKind`] is only a
//! classification view over them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome classification of a disjunct
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LabelKind {
    Ok,
    ExitProgram,
    AbortProgram,
    LatentAbortProgram,
    InvalidAccess,
    LatentInvalidAccess,
    IslLatentMemoryError,
    ErrorRetainCycle,
    ErrorMemoryLeak,
    ErrorResourceLeak,
    ErrorException,
    Other(String),
}

impl LabelKind {
    pub fn from_text(text: &str) -> Self {
        match text {
            "Ok" => Self::Ok,
            "ExitProgram" => Self::ExitProgram,
            "AbortProgram" => Self::AbortProgram,
            "LatentAbortProgram" => Self::LatentAbortProgram,
            "InvalidAccess" => Self::InvalidAccess,
            "LatentInvalidAccess" => Self::LatentInvalidAccess,
            "ISLLatentMemoryError" => Self::IslLatentMemoryError,
            "ErrorRetainCycle" => Self::ErrorRetainCycle,
            "ErrorMemoryLeak" => Self::ErrorMemoryLeak,
            "ErrorResourceLeak" => Self::ErrorResourceLeak,
            "ErrorException" => Self::ErrorException,
            other => Self::Other(other.to_string()),
        }
    }

    /// Kinds that count as a bug when judging whether a patch introduced one
    pub fn is_error_like(&self) -> bool {
        matches!(
            self,
            Self::ErrorMemoryLeak
                | Self::ErrorResourceLeak
                | Self::AbortProgram
                | Self::LatentAbortProgram
                | Self::InvalidAccess
                | Self::LatentInvalidAccess
        )
    }

    pub fn is_abort(&self) -> bool {
        matches!(self, Self::AbortProgram | Self::LatentAbortProgram)
    }

    /// Error kinds whose disjuncts merge without comparing general formulas
    pub fn is_merge_eligible(&self) -> bool {
        matches!(self, Self::AbortProgram | Self::ErrorMemoryLeak)
    }
}

/// Outcome text plus the branch's `[start, end]` source lines
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DisjunctLabel {
    pub text: String,
    pub start_line: i64,
    pub end_line: i64,
}

impl DisjunctLabel {
    pub fn new(text: impl Into<String>, start_line: i64, end_line: i64) -> Self {
        Self {
            text: text.into(),
            start_line,
            end_line,
        }
    }

    pub fn kind(&self) -> LabelKind {
        LabelKind::from_text(&self.text)
    }

    pub fn is_ok(&self) -> bool {
        self.kind() == LabelKind::Ok
    }

    pub fn is_error_like(&self) -> bool {
        self.kind().is_error_like()
    }

    pub fn is_abort(&self) -> bool {
        self.kind().is_abort()
    }

    pub fn is_merge_eligible(&self) -> bool {
        self.kind().is_merge_eligible()
    }

    /// Same text and start line; the end line may differ
    pub fn same_text_and_start(&self, other: &DisjunctLabel) -> bool {
        self.text == other.text && self.start_line == other.start_line
    }
}

impl fmt::Display for DisjunctLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}, {}, {}>", self.text, self.start_line, self.end_line)
    }
}
