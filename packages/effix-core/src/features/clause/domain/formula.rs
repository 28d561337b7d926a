//! Solver-neutral formulas
//!
//! Clause lists are folded into [`Formula`] values before they reach a
//! decision procedure. Constructors normalise only what is free to
//! normalise: nested conjunctions/disjunctions are flattened, `True`/`False`
//! units are absorbed and syntactic duplicates are dropped. Anything deeper
//! is the decision procedure's job.

use super::term::Clause;
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Formula {
    True,
    False,
    Atom(Clause),
    Not(Box<Formula>),
    And(Vec<Formula>),
    Or(Vec<Formula>),
    Iff(Box<Formula>, Box<Formula>),
    Exists(Vec<String>, Box<Formula>),
}

impl Default for Formula {
    fn default() -> Self {
        Formula::True
    }
}

impl Formula {
    /// Lift a clause; the `True` clause becomes the `True` formula
    pub fn atom(clause: Clause) -> Self {
        match clause {
            Clause::True => Formula::True,
            other => Formula::Atom(other),
        }
    }

    /// Conjunction of clauses, `True` when empty
    pub fn conjunction_of(clauses: &[Clause]) -> Self {
        Formula::and(clauses.iter().cloned().map(Formula::atom).collect())
    }

    pub fn and(parts: Vec<Formula>) -> Self {
        let mut flat: Vec<Formula> = Vec::with_capacity(parts.len());
        for part in parts {
            match part {
                Formula::True => {}
                Formula::False => return Formula::False,
                Formula::And(inner) => {
                    for f in inner {
                        if !flat.contains(&f) {
                            flat.push(f);
                        }
                    }
                }
                other => {
                    if !flat.contains(&other) {
                        flat.push(other);
                    }
                }
            }
        }
        match flat.len() {
            0 => Formula::True,
            1 => flat.remove(0),
            _ => Formula::And(flat),
        }
    }

    pub fn or(parts: Vec<Formula>) -> Self {
        let mut flat: Vec<Formula> = Vec::with_capacity(parts.len());
        for part in parts {
            match part {
                Formula::False => {}
                Formula::True => return Formula::True,
                Formula::Or(inner) => {
                    for f in inner {
                        if !flat.contains(&f) {
                            flat.push(f);
                        }
                    }
                }
                other => {
                    if !flat.contains(&other) {
                        flat.push(other);
                    }
                }
            }
        }
        match flat.len() {
            0 => Formula::False,
            1 => flat.remove(0),
            _ => Formula::Or(flat),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: Formula) -> Self {
        match inner {
            Formula::True => Formula::False,
            Formula::False => Formula::True,
            Formula::Not(f) => *f,
            other => Formula::Not(Box::new(other)),
        }
    }

    pub fn iff(lhs: Formula, rhs: Formula) -> Self {
        if lhs == rhs {
            return Formula::True;
        }
        Formula::Iff(Box::new(lhs), Box::new(rhs))
    }

    /// `∃ vars. body`, dropping variables that do not occur free in `body`
    pub fn exists(vars: Vec<String>, body: Formula) -> Self {
        let free = body.free_variables();
        let mut bound: Vec<String> = vars.into_iter().filter(|v| free.contains(v)).collect();
        bound.sort();
        bound.dedup();
        if bound.is_empty() {
            return body;
        }
        Formula::Exists(bound, Box::new(body))
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Formula::True)
    }

    /// Symbols occurring free (outside any binding `Exists`)
    pub fn free_variables(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_free(&mut out, &BTreeSet::new());
        out
    }

    fn collect_free(&self, out: &mut BTreeSet<String>, bound: &BTreeSet<String>) {
        match self {
            Formula::True | Formula::False => {}
            Formula::Atom(clause) => {
                let mut symbols = BTreeSet::new();
                clause.collect_symbols(&mut symbols);
                out.extend(symbols.into_iter().filter(|s| !bound.contains(s)));
            }
            Formula::Not(inner) => inner.collect_free(out, bound),
            Formula::And(parts) | Formula::Or(parts) => {
                for part in parts {
                    part.collect_free(out, bound);
                }
            }
            Formula::Iff(lhs, rhs) => {
                lhs.collect_free(out, bound);
                rhs.collect_free(out, bound);
            }
            Formula::Exists(vars, body) => {
                let mut inner_bound = bound.clone();
                inner_bound.extend(vars.iter().cloned());
                body.collect_free(out, &inner_bound);
            }
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, parts: &[Formula], sep: &str) -> fmt::Result {
            write!(f, "(")?;
            for (i, part) in parts.iter().enumerate() {
                if i > 0 {
                    write!(f, " {} ", sep)?;
                }
                write!(f, "{}", part)?;
            }
            write!(f, ")")
        }

        match self {
            Formula::True => write!(f, "True"),
            Formula::False => write!(f, "False"),
            Formula::Atom(clause) => write!(f, "{}", clause),
            Formula::Not(inner) => write!(f, "!({})", inner),
            Formula::And(parts) => join(f, parts, "&"),
            Formula::Or(parts) => join(f, parts, "|"),
            Formula::Iff(lhs, rhs) => write!(f, "({} <-> {})", lhs, rhs),
            Formula::Exists(vars, body) => write!(f, "exists {}. {}", vars.join(", "), body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eq(name: &str, value: i64) -> Formula {
        Formula::atom(Clause::equal(Clause::symbol(name), Clause::int(value)))
    }

    #[test]
    fn test_and_flattens_and_absorbs() {
        let f = Formula::and(vec![
            Formula::True,
            Formula::and(vec![eq("x", 1), eq("y", 2)]),
            eq("x", 1),
        ]);
        assert_eq!(f, Formula::And(vec![eq("x", 1), eq("y", 2)]));
        assert_eq!(Formula::and(vec![eq("x", 1), Formula::False]), Formula::False);
        assert_eq!(Formula::and(vec![]), Formula::True);
    }

    #[test]
    fn test_or_absorbs_true() {
        assert_eq!(Formula::or(vec![eq("x", 1), Formula::True]), Formula::True);
        assert_eq!(Formula::or(vec![Formula::False, eq("x", 1)]), eq("x", 1));
    }

    #[test]
    fn test_true_clause_becomes_true_formula() {
        assert_eq!(Formula::conjunction_of(&[Clause::True]), Formula::True);
    }

    #[test]
    fn test_exists_binds_only_free_variables() {
        let body = Formula::and(vec![eq("a1", 0), eq("x", 1)]);
        let f = Formula::exists(vec!["a1".into(), "a2".into()], body);
        match &f {
            Formula::Exists(vars, _) => assert_eq!(vars, &vec!["a1".to_string()]),
            other => panic!("expected Exists, got {}", other),
        }
        let free: Vec<_> = f.free_variables().into_iter().collect();
        assert_eq!(free, vec!["x".to_string()]);
    }

    #[test]
    fn test_double_negation() {
        assert_eq!(Formula::not(Formula::not(eq("x", 1))), eq("x", 1));
    }
}
