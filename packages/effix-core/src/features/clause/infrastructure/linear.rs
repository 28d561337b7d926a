//! Linear normal form
//!
//! Every relational atom is rewritten to `Σ cᵢ·xᵢ + k  ⋈ 0` with
//! `⋈ ∈ {=, ≤, ≠}` over the integers. Strict inequalities become `≤` by
//! shifting the constant, so the solver only ever sees three relations.
//! Arithmetic is `i128` with checked operations; an overflow is reported,
//! never wrapped.

use crate::features::clause::domain::{Clause, LinearTerm};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinearError {
    #[error("non-linear term: {0}")]
    NonLinear(String),

    #[error("term is not a relation: {0}")]
    NotARelation(String),

    #[error("integer overflow in linear arithmetic")]
    Overflow,
}

pub type LinearResult<T> = Result<T, LinearError>;

/// `Σ coeffs[x]·x + constant`; zero coefficients are never stored
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct LinExpr {
    pub coeffs: BTreeMap<String, i128>,
    pub constant: i128,
}

impl LinExpr {
    pub fn constant(value: i128) -> Self {
        Self {
            coeffs: BTreeMap::new(),
            constant: value,
        }
    }

    pub fn var(name: &str) -> Self {
        let mut coeffs = BTreeMap::new();
        coeffs.insert(name.to_string(), 1);
        Self {
            coeffs,
            constant: 0,
        }
    }

    pub fn from_clause(term: &Clause) -> LinearResult<Self> {
        match term {
            Clause::Int(value) => Ok(Self::constant(*value as i128)),
            Clause::Symbol(name) => Ok(Self::var(name)),
            Clause::Plus(lhs, rhs) => Self::from_clause(lhs)?.add(&Self::from_clause(rhs)?),
            Clause::Times(lhs, rhs) => {
                let l = Self::from_clause(lhs)?;
                let r = Self::from_clause(rhs)?;
                if l.is_constant() {
                    r.scale(l.constant)
                } else if r.is_constant() {
                    l.scale(r.constant)
                } else {
                    Err(LinearError::NonLinear(term.to_string()))
                }
            }
            other => Err(LinearError::NotARelation(other.to_string())),
        }
    }

    pub fn is_constant(&self) -> bool {
        self.coeffs.is_empty()
    }

    pub fn coefficient(&self, var: &str) -> i128 {
        self.coeffs.get(var).copied().unwrap_or(0)
    }

    pub fn variables(&self) -> impl Iterator<Item = &String> {
        self.coeffs.keys()
    }

    pub fn add(&self, other: &LinExpr) -> LinearResult<Self> {
        let mut result = self.clone();
        for (var, coeff) in &other.coeffs {
            let entry = result.coeffs.entry(var.clone()).or_insert(0);
            *entry = entry.checked_add(*coeff).ok_or(LinearError::Overflow)?;
            if *entry == 0 {
                result.coeffs.remove(var);
            }
        }
        result.constant = result
            .constant
            .checked_add(other.constant)
            .ok_or(LinearError::Overflow)?;
        Ok(result)
    }

    pub fn scale(&self, factor: i128) -> LinearResult<Self> {
        if factor == 0 {
            return Ok(Self::constant(0));
        }
        let mut coeffs = BTreeMap::new();
        for (var, coeff) in &self.coeffs {
            coeffs.insert(
                var.clone(),
                coeff.checked_mul(factor).ok_or(LinearError::Overflow)?,
            );
        }
        Ok(Self {
            coeffs,
            constant: self
                .constant
                .checked_mul(factor)
                .ok_or(LinearError::Overflow)?,
        })
    }

    pub fn sub(&self, other: &LinExpr) -> LinearResult<Self> {
        self.add(&other.scale(-1)?)
    }

    /// Replace `var` by `value`
    pub fn substitute(&self, var: &str, value: &LinExpr) -> LinearResult<Self> {
        let coeff = self.coefficient(var);
        if coeff == 0 {
            return Ok(self.clone());
        }
        let mut rest = self.clone();
        rest.coeffs.remove(var);
        rest.add(&value.scale(coeff)?)
    }

    pub fn rename(&self, renames: &BTreeMap<String, String>) -> Self {
        if renames.is_empty() {
            return self.clone();
        }
        let coeffs = self
            .coeffs
            .iter()
            .map(|(var, coeff)| (renames.get(var).unwrap_or(var).clone(), *coeff))
            .collect();
        Self {
            coeffs,
            constant: self.constant,
        }
    }

    fn coefficient_gcd(&self) -> i128 {
        self.coeffs.values().fold(0, |acc, c| gcd(acc, *c))
    }
}

impl fmt::Display for LinExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (var, coeff) in &self.coeffs {
            write!(f, "{}·{} + ", coeff, var)?;
        }
        write!(f, "{}", self.constant)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rel {
    Eq,
    Le,
    Ne,
}

/// `expr ⋈ 0`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Constraint {
    pub expr: LinExpr,
    pub rel: Rel,
}

/// Result of normalising a constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    /// No variables left; the constraint is decided
    Trivial(bool),
    Constraint(Constraint),
}

impl Constraint {
    pub fn new(expr: LinExpr, rel: Rel) -> Self {
        Self { expr, rel }
    }

    /// Constraint for a relational atom under the given polarity
    pub fn from_atom(atom: &Clause, positive: bool) -> LinearResult<Normalized> {
        let (lhs, rhs, kind) = match atom {
            Clause::True => return Ok(Normalized::Trivial(positive)),
            Clause::Equal(l, r) => (l, r, 0),
            Clause::NotEqual(l, r) => (l, r, 1),
            Clause::LessEqual(l, r) => (l, r, 2),
            Clause::LessThan(l, r) => (l, r, 3),
            other => return Err(LinearError::NotARelation(other.to_string())),
        };
        let l = LinExpr::from_clause(lhs)?;
        let r = LinExpr::from_clause(rhs)?;
        let one = LinExpr::constant(1);

        let constraint = match (kind, positive) {
            (0, true) | (1, false) => Constraint::new(l.sub(&r)?, Rel::Eq),
            (0, false) | (1, true) => Constraint::new(l.sub(&r)?, Rel::Ne),
            // l <= r
            (2, true) => Constraint::new(l.sub(&r)?, Rel::Le),
            // l > r  <=>  r - l + 1 <= 0
            (2, false) => Constraint::new(r.sub(&l)?.add(&one)?, Rel::Le),
            // l < r  <=>  l - r + 1 <= 0
            (3, true) => Constraint::new(l.sub(&r)?.add(&one)?, Rel::Le),
            // l >= r
            _ => Constraint::new(r.sub(&l)?, Rel::Le),
        };
        Ok(constraint.normalize())
    }

    /// Divide through by the coefficient gcd, tightening `≤` constants
    pub fn normalize(self) -> Normalized {
        if self.expr.is_constant() {
            let k = self.expr.constant;
            return Normalized::Trivial(match self.rel {
                Rel::Eq => k == 0,
                Rel::Le => k <= 0,
                Rel::Ne => k != 0,
            });
        }

        let g = self.expr.coefficient_gcd();
        let k = self.expr.constant;
        let constant = match self.rel {
            Rel::Eq if k % g != 0 => return Normalized::Trivial(false),
            Rel::Ne if k % g != 0 => return Normalized::Trivial(true),
            Rel::Eq | Rel::Ne => k / g,
            Rel::Le => ceil_div(k, g),
        };
        let coeffs = self
            .expr
            .coeffs
            .into_iter()
            .map(|(var, c)| (var, c / g))
            .collect();
        Normalized::Constraint(Constraint {
            expr: LinExpr { coeffs, constant },
            rel: self.rel,
        })
    }

    pub fn mentions(&self, var: &str) -> bool {
        self.expr.coefficient(var) != 0
    }

    pub fn substitute(&self, var: &str, value: &LinExpr) -> LinearResult<Normalized> {
        Ok(Constraint::new(self.expr.substitute(var, value)?, self.rel).normalize())
    }

    pub fn rename(&self, renames: &BTreeMap<String, String>) -> Self {
        Constraint::new(self.expr.rename(renames), self.rel)
    }

    /// `e ≠ 0` as the two strict sides `e ≤ -1` and `-e ≤ -1`
    pub fn split_disequality(&self) -> LinearResult<[Normalized; 2]> {
        let one = LinExpr::constant(1);
        let below = Constraint::new(self.expr.add(&one)?, Rel::Le).normalize();
        let above = Constraint::new(self.expr.scale(-1)?.add(&one)?, Rel::Le).normalize();
        Ok([below, above])
    }

    /// Back to a clause: `Σ cᵢ·xᵢ ⋈ -k`
    pub fn to_clause(&self) -> LinearResult<Clause> {
        let mut terms = Vec::with_capacity(self.expr.coeffs.len());
        for (var, coeff) in &self.expr.coeffs {
            let coeff = i64::try_from(*coeff).map_err(|_| LinearError::Overflow)?;
            terms.push(LinearTerm::var(var.clone(), coeff));
        }
        let rhs = self
            .expr
            .constant
            .checked_neg()
            .and_then(|k| i64::try_from(k).ok())
            .ok_or(LinearError::Overflow)?;

        // a non-constant expression always has at least one term
        let lhs = Clause::linear(&terms).map_err(|e| LinearError::NotARelation(e.to_string()))?;
        let rhs = Clause::int(rhs);
        Ok(match self.rel {
            Rel::Eq => Clause::equal(lhs, rhs),
            Rel::Le => Clause::less_equal(lhs, rhs),
            Rel::Ne => Clause::not_equal(lhs, rhs),
        })
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rel = match self.rel {
            Rel::Eq => "=",
            Rel::Le => "<=",
            Rel::Ne => "!=",
        };
        write!(f, "{} {} 0", self.expr, rel)
    }
}

/// Variables of a constraint set, sorted
pub fn variables_of(constraints: &[Constraint]) -> BTreeSet<String> {
    constraints
        .iter()
        .flat_map(|c| c.expr.variables().cloned())
        .collect()
}

pub fn gcd(a: i128, b: i128) -> i128 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

fn ceil_div(k: i128, g: i128) -> i128 {
    -((-k).div_euclid(g))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constraint(n: Normalized) -> Constraint {
        match n {
            Normalized::Constraint(c) => c,
            Normalized::Trivial(b) => panic!("unexpected trivial {}", b),
        }
    }

    #[test]
    fn test_strict_inequality_becomes_non_strict() {
        let atom = Clause::less_than(Clause::symbol("x"), Clause::int(3));
        let c = constraint(Constraint::from_atom(&atom, true).unwrap());
        // x - 3 + 1 <= 0
        assert_eq!(c.rel, Rel::Le);
        assert_eq!(c.expr.coefficient("x"), 1);
        assert_eq!(c.expr.constant, -2);
    }

    #[test]
    fn test_negated_less_equal() {
        let atom = Clause::less_equal(Clause::symbol("x"), Clause::int(0));
        // !(x <= 0)  <=>  -x + 1 <= 0
        let c = constraint(Constraint::from_atom(&atom, false).unwrap());
        assert_eq!(c.expr.coefficient("x"), -1);
        assert_eq!(c.expr.constant, 1);
    }

    #[test]
    fn test_gcd_tightening() {
        // 2x - 3 <= 0  =>  x - 1 <= 0  (x <= 1.5 over integers is x <= 1)
        let mut expr = LinExpr::var("x").scale(2).unwrap();
        expr.constant = -3;
        let c = constraint(Constraint::new(expr, Rel::Le).normalize());
        assert_eq!(c.expr.coefficient("x"), 1);
        assert_eq!(c.expr.constant, -1);
    }

    #[test]
    fn test_equality_without_integer_solution() {
        let mut expr = LinExpr::var("x").scale(2).unwrap();
        expr.constant = -1;
        assert_eq!(
            Constraint::new(expr, Rel::Eq).normalize(),
            Normalized::Trivial(false)
        );
    }

    #[test]
    fn test_non_linear_rejected() {
        let atom = Clause::equal(
            Clause::times(Clause::symbol("x"), Clause::symbol("y")),
            Clause::int(0),
        );
        assert!(matches!(
            Constraint::from_atom(&atom, true),
            Err(LinearError::NonLinear(_))
        ));
    }

    #[test]
    fn test_to_clause() {
        let atom = Clause::equal(Clause::symbol("x"), Clause::plus(Clause::symbol("y"), Clause::int(1)));
        let c = constraint(Constraint::from_atom(&atom, true).unwrap());
        assert_eq!(c.to_clause().unwrap().to_string(), "x + -1 * y = 1");
    }
}
