//! Clause terms
//!
//! An immutable term algebra for the linear-arithmetic facts reported by the
//! analyzer. A clause never goes above the relational level: conjunction,
//! disjunction and quantifiers belong to [`Formula`](super::Formula).
//!
//! ```text
//! Clause ::= t = t | t != t | t <= t | t < t | True
//! t      ::= t + t | t * t | <int> | <symbol>
//! ```

use super::ClauseError;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;
use std::fmt;

lazy_static! {
    /// Non-negative witness variables introduced by the analyzer (`a12`)
    static ref RESTRICTED_VAR: Regex = Regex::new(r"^a[0-9]+$").unwrap();
    /// Raw logical variables (`v7`)
    static ref LOGICAL_VAR: Regex = Regex::new(r"^v[0-9]+$").unwrap();
}

/// `true` for solver-introduced witness names (`a` + digits)
pub fn is_restricted_var(name: &str) -> bool {
    RESTRICTED_VAR.is_match(name)
}

/// `true` for raw logical-variable names (`v` + digits)
pub fn is_logical_var(name: &str) -> bool {
    LOGICAL_VAR.is_match(name)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Clause {
    Equal(Box<Clause>, Box<Clause>),
    NotEqual(Box<Clause>, Box<Clause>),
    LessEqual(Box<Clause>, Box<Clause>),
    LessThan(Box<Clause>, Box<Clause>),
    Plus(Box<Clause>, Box<Clause>),
    Times(Box<Clause>, Box<Clause>),
    Int(i64),
    Symbol(String),
    True,
}

/// One summand of a linear sum; `symbol == None` is the constant part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearTerm {
    pub symbol: Option<String>,
    pub coefficient: i64,
}

impl LinearTerm {
    pub fn constant(value: i64) -> Self {
        Self {
            symbol: None,
            coefficient: value,
        }
    }

    pub fn var(symbol: impl Into<String>, coefficient: i64) -> Self {
        Self {
            symbol: Some(symbol.into()),
            coefficient,
        }
    }
}

/// Side of an atom as reported by the analyzer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Const(i64),
    Linear(Vec<LinearTerm>),
}

/// Relational kind of an atom
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationKind {
    Equal,
    NotEqual,
    LessEqual,
    LessThan,
    /// Anything else the analyzer may emit; degrades to `True`
    Unsupported(String),
}

impl RelationKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "Equal" => Self::Equal,
            "NotEqual" => Self::NotEqual,
            "LessEqual" => Self::LessEqual,
            "LessThan" => Self::LessThan,
            other => Self::Unsupported(other.to_string()),
        }
    }
}

impl Clause {
    pub fn symbol(name: impl Into<String>) -> Self {
        Clause::Symbol(name.into())
    }

    pub fn int(value: i64) -> Self {
        Clause::Int(value)
    }

    pub fn equal(lhs: Clause, rhs: Clause) -> Self {
        Clause::Equal(Box::new(lhs), Box::new(rhs))
    }

    pub fn not_equal(lhs: Clause, rhs: Clause) -> Self {
        Clause::NotEqual(Box::new(lhs), Box::new(rhs))
    }

    pub fn less_equal(lhs: Clause, rhs: Clause) -> Self {
        Clause::LessEqual(Box::new(lhs), Box::new(rhs))
    }

    pub fn less_than(lhs: Clause, rhs: Clause) -> Self {
        Clause::LessThan(Box::new(lhs), Box::new(rhs))
    }

    pub fn plus(lhs: Clause, rhs: Clause) -> Self {
        Clause::Plus(Box::new(lhs), Box::new(rhs))
    }

    pub fn times(lhs: Clause, rhs: Clause) -> Self {
        Clause::Times(Box::new(lhs), Box::new(rhs))
    }

    /// Build `c1·x1 + ... + cn·xn + c0`
    ///
    /// A coefficient of 1 omits the multiplication. When there is more than
    /// one summand, constant zeros are dropped.
    pub fn linear(terms: &[LinearTerm]) -> Result<Clause, ClauseError> {
        if terms.is_empty() {
            return Err(ClauseError::EmptyLinearSum);
        }

        let mut summands: Vec<Clause> = terms
            .iter()
            .map(|term| match &term.symbol {
                None => Clause::Int(term.coefficient),
                Some(name) if term.coefficient == 1 => Clause::symbol(name.clone()),
                Some(name) => Clause::times(Clause::Int(term.coefficient), Clause::symbol(name.clone())),
            })
            .collect();

        if summands.len() == 1 {
            return Ok(summands.remove(0));
        }

        summands.retain(|s| !matches!(s, Clause::Int(0)));
        let mut iter = summands.into_iter();
        let Some(first) = iter.next() else {
            return Ok(Clause::Int(0));
        };
        Ok(iter.fold(first, Clause::plus))
    }

    fn operand(operand: &Operand) -> Result<Clause, ClauseError> {
        match operand {
            Operand::Const(value) => Ok(Clause::Int(*value)),
            Operand::Linear(terms) => Clause::linear(terms),
        }
    }

    /// `symbol = linear sum`
    pub fn equality_to_symbol(lhs: &str, rhs: &[LinearTerm]) -> Result<Clause, ClauseError> {
        Ok(Clause::equal(Clause::symbol(lhs), Clause::linear(rhs)?))
    }

    pub fn equality(lhs: &Operand, rhs: &Operand) -> Result<Clause, ClauseError> {
        Ok(Clause::equal(Clause::operand(lhs)?, Clause::operand(rhs)?))
    }

    /// Build an atom of the given kind; unsupported kinds become `True`
    pub fn relation(kind: &RelationKind, lhs: &Operand, rhs: &Operand) -> Result<Clause, ClauseError> {
        let build: fn(Clause, Clause) -> Clause = match kind {
            RelationKind::Equal => Clause::equal,
            RelationKind::NotEqual => Clause::not_equal,
            RelationKind::LessEqual => Clause::less_equal,
            RelationKind::LessThan => Clause::less_than,
            RelationKind::Unsupported(_) => return Ok(Clause::True),
        };
        Ok(build(Clause::operand(lhs)?, Clause::operand(rhs)?))
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Clause::Symbol(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Clause::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// `a_ + 1` or `1 + a_` with `a_` a restricted variable
    pub fn is_restricted_plus_one(&self) -> bool {
        let Clause::Plus(lhs, rhs) = self else {
            return false;
        };
        let restricted_and_one = |sym: &Clause, one: &Clause| {
            sym.as_symbol().is_some_and(is_restricted_var) && one.as_int() == Some(1)
        };
        restricted_and_one(lhs, rhs) || restricted_and_one(rhs, lhs)
    }

    /// Textual heuristic: mentions `return` but is not a field access on it
    pub fn is_about_return_value(&self) -> bool {
        let text = self.to_string();
        text.contains("return") && !text.contains("return->")
    }

    /// Collect every symbol name in this term
    pub fn collect_symbols(&self, out: &mut BTreeSet<String>) {
        match self {
            Clause::Equal(l, r)
            | Clause::NotEqual(l, r)
            | Clause::LessEqual(l, r)
            | Clause::LessThan(l, r)
            | Clause::Plus(l, r)
            | Clause::Times(l, r) => {
                l.collect_symbols(out);
                r.collect_symbols(out);
            }
            Clause::Symbol(name) => {
                out.insert(name.clone());
            }
            Clause::Int(_) | Clause::True => {}
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Equal(l, r) => write!(f, "{} = {}", l, r),
            Clause::NotEqual(l, r) => write!(f, "{} != {}", l, r),
            Clause::LessEqual(l, r) => write!(f, "{} <= {}", l, r),
            Clause::LessThan(l, r) => write!(f, "{} < {}", l, r),
            Clause::Plus(l, r) => write!(f, "{} + {}", l, r),
            Clause::Times(l, r) => write!(f, "{} * {}", l, r),
            Clause::Int(value) => write!(f, "{}", value),
            Clause::Symbol(name) => write!(f, "{}", name),
            Clause::True => write!(f, "True"),
        }
    }
}
