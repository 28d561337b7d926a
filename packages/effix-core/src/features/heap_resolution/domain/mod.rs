//! Heap resolution domain models
//!
//! ```text
//! SymbolicState ::= heap × stack × attrs
//!
//! heap  = lvar → [(EdgeLabel, lvar)]
//! stack = pvar → lvar                (root bindings)
//! attrs = lvar → [Attribute]
//! ```

use std::collections::BTreeSet;
use std::fmt;

/// Set of program-variable expressions denoting one logical variable
pub type AliasGroup = BTreeSet<String>;

/// Set of alias groups (allocated / deallocated objects)
pub type AliasSets = BTreeSet<AliasGroup>;

/// Label of a heap edge
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeLabel {
    Dereference,
    Field(String),
}

impl fmt::Display for EdgeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeLabel::Dereference => write!(f, "*"),
            EdgeLabel::Field(name) => write!(f, "{}", name),
        }
    }
}

/// Free reason that counts as an explicit deallocation
pub const EXPLICIT_FREE: &str = "CFree";

/// Per-lvar marker reported by the analyzer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attribute {
    /// The lvar is the address of the named stack variable
    AddressOfStackVariable(String),
    Allocated,
    /// Invalidated; `reason` is the analyzer's invalidation tag
    Invalid { reason: String },
    /// Anything else; ignored by every classification
    Unrecognized(String),
}

impl Attribute {
    pub fn is_explicit_free(&self) -> bool {
        matches!(self, Attribute::Invalid { reason } if reason == EXPLICIT_FREE)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeapEntry {
    pub parent: String,
    pub edges: Vec<(EdgeLabel, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackBinding {
    pub pvar: String,
    pub lvar: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeEntry {
    pub lvar: String,
    pub attributes: Vec<Attribute>,
}

impl AttributeEntry {
    /// Allocated and not explicitly freed
    pub fn is_allocated(&self) -> bool {
        self.attributes.contains(&Attribute::Allocated) && !self.is_deallocated()
    }

    pub fn is_deallocated(&self) -> bool {
        self.attributes.iter().any(Attribute::is_explicit_free)
    }

    /// Program variables whose address this lvar is
    pub fn stack_roots(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().filter_map(|attr| match attr {
            Attribute::AddressOfStackVariable(pvar) => Some(pvar.as_str()),
            _ => None,
        })
    }
}

/// One symbolic post-state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolicState {
    pub heap: Vec<HeapEntry>,
    pub stack: Vec<StackBinding>,
    pub attrs: Vec<AttributeEntry>,
}

/// `&(pvar)`, the name given to a stack root
pub fn root_name(pvar: &str) -> String {
    format!("&({})", pvar)
}

/// Name reached by following `label` from `parent`
///
/// Dereferencing `&(X)` yields `X`; any other dereference wraps in `*(..)`.
/// A field access yields `&(X->field)`.
pub fn child_name(parent: &str, label: &EdgeLabel) -> String {
    match label {
        EdgeLabel::Dereference => match parent.strip_prefix("&(").and_then(|p| p.strip_suffix(')')) {
            Some(inner) => inner.to_string(),
            None => format!("*({})", parent),
        },
        EdgeLabel::Field(field) => format!("&({}->{})", parent, field),
    }
}
