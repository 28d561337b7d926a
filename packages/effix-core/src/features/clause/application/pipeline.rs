//! Clause normalisation and formula realisation
//!
//! ```text
//! ClauseLists ──rewrite restricted vars──▶ ──drop redundant pointer clauses──▶
//!             ──separate return clauses──▶ FormulaCollection::realize
//!             ──inject aliasing──▶ ──eliminate a/v variables──▶ solver-ready
//! ```
//!
//! The clause passes are pure functions over `&[Clause]`; each returns a
//! fresh list.

use super::oracle::FormulaOracle;
use crate::features::clause::domain::{is_logical_var, is_restricted_var, Clause, Formula};
use crate::features::clause::ports::{EliminationError, OracleError};
use std::collections::BTreeSet;

/// Rewrite `sym = a + 1` and `a + 1 = sym` to `sym != 0`
pub fn rewrite_restricted_vars(clauses: &[Clause]) -> Vec<Clause> {
    clauses
        .iter()
        .map(|clause| match clause {
            Clause::Equal(lhs, rhs) if lhs.as_symbol().is_some() && rhs.is_restricted_plus_one() => {
                Clause::not_equal((**lhs).clone(), Clause::int(0))
            }
            Clause::Equal(lhs, rhs) if rhs.as_symbol().is_some() && lhs.is_restricted_plus_one() => {
                Clause::not_equal((**rhs).clone(), Clause::int(0))
            }
            other => other.clone(),
        })
        .collect()
}

/// Symbols `s` with a `s != 0` or `0 != s` clause
fn non_null_symbols(clauses: &[Clause]) -> BTreeSet<&str> {
    clauses
        .iter()
        .filter_map(|clause| match clause {
            Clause::NotEqual(lhs, rhs) => match (lhs.as_symbol(), rhs.as_int(), lhs.as_int(), rhs.as_symbol()) {
                (Some(sym), Some(0), _, _) => Some(sym),
                (_, _, Some(0), Some(sym)) => Some(sym),
                _ => None,
            },
            _ => None,
        })
        .collect()
}

/// Drop `1 <= sym` and `sym = a + 1` (either side) when `sym != 0` is present
pub fn remove_redundant_pointer_clauses(clauses: &[Clause]) -> Vec<Clause> {
    let non_null = non_null_symbols(clauses);
    let is_non_null = |term: &Clause| term.as_symbol().is_some_and(|s| non_null.contains(s));

    clauses
        .iter()
        .filter(|clause| match clause {
            Clause::LessEqual(lhs, rhs) => !(lhs.as_int() == Some(1) && is_non_null(rhs)),
            Clause::Equal(lhs, rhs) => {
                let forward = is_non_null(lhs) && rhs.is_restricted_plus_one();
                let backward = is_non_null(rhs) && lhs.is_restricted_plus_one();
                !(forward || backward)
            }
            _ => true,
        })
        .cloned()
        .collect()
}

/// Split into `(general, return-value)` clauses
pub fn separate_return_clauses(clauses: Vec<Clause>) -> (Vec<Clause>, Vec<Clause>) {
    clauses.into_iter().partition(|c| !c.is_about_return_value())
}

/// Raw clause lists of one disjunct
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClauseLists {
    /// Path-condition-only clauses
    pub path: Vec<Clause>,
    pub full: Vec<Clause>,
    /// Clauses about the call's result; filled by [`ClauseLists::normalize`]
    pub ret: Vec<Clause>,
}

impl ClauseLists {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend_full(&mut self, clauses: impl IntoIterator<Item = Clause>) {
        self.full.extend(clauses);
    }

    pub fn extend_path(&mut self, clauses: impl IntoIterator<Item = Clause>) {
        self.path.extend(clauses);
    }

    /// Apply the three clause passes
    ///
    /// Return clauses are separated from the full list only; the path list
    /// keeps them.
    pub fn normalize(self) -> Self {
        let path = remove_redundant_pointer_clauses(&rewrite_restricted_vars(&self.path));
        let full = remove_redundant_pointer_clauses(&rewrite_restricted_vars(&self.full));
        let (full, mut ret) = separate_return_clauses(full);
        let mut all_ret = self.ret;
        all_ret.append(&mut ret);
        Self {
            path,
            full,
            ret: all_ret,
        }
    }
}

/// Equalities chaining every alias group that shares a variable with `formula`
pub fn inject_aliasing<'g>(
    formula: Formula,
    groups: impl IntoIterator<Item = &'g BTreeSet<String>>,
) -> Formula {
    let free = formula.free_variables();
    let mut conjuncts = vec![formula];
    for group in groups {
        if group.len() < 2 || !group.iter().any(|pvar| free.contains(pvar)) {
            continue;
        }
        let members: Vec<&String> = group.iter().collect();
        for pair in members.windows(2) {
            conjuncts.push(Formula::atom(Clause::equal(
                Clause::symbol(pair[0].clone()),
                Clause::symbol(pair[1].clone()),
            )));
        }
    }
    Formula::and(conjuncts)
}

/// Existentially eliminate restricted (`a<n>`, constrained `>= 0`) and
/// leftover logical (`v<n>`) variables
///
/// An untranslatable elimination result degrades to `True`; a failing
/// decision procedure is an error.
pub fn eliminate_logical_vars(formula: Formula, oracle: &FormulaOracle) -> Result<Formula, OracleError> {
    let free = formula.free_variables();
    let restricted: Vec<String> = free.iter().filter(|v| is_restricted_var(v)).cloned().collect();
    let leftover: Vec<String> = free.iter().filter(|v| is_logical_var(v)).cloned().collect();
    if restricted.is_empty() && leftover.is_empty() {
        return Ok(formula);
    }

    let mut conjuncts = vec![formula];
    conjuncts.extend(
        restricted
            .iter()
            .map(|a| Formula::atom(Clause::less_equal(Clause::int(0), Clause::symbol(a.clone())))),
    );
    let body = Formula::and(conjuncts);

    let mut vars = restricted;
    vars.extend(leftover);
    match oracle.eliminate(&vars, &body) {
        Ok(eliminated) => Ok(eliminated),
        Err(EliminationError::Untranslatable(reason)) => {
            tracing::warn!("Quantifier elimination result dropped ({}); using True", reason);
            Ok(Formula::True)
        }
        Err(EliminationError::Backend(e)) => Err(e),
    }
}

/// The three formula streams of one disjunct
#[derive(Debug, Clone, PartialEq)]
pub struct FormulaCollection {
    /// Path condition only; kept for completeness, unused by comparisons
    pub path: Formula,
    pub full: Formula,
    pub ret: Formula,
}

impl Default for FormulaCollection {
    fn default() -> Self {
        Self {
            path: Formula::True,
            full: Formula::True,
            ret: Formula::True,
        }
    }
}

impl FormulaCollection {
    /// Fold each clause list into a conjunction
    pub fn realize(lists: &ClauseLists) -> Self {
        Self {
            path: Formula::conjunction_of(&lists.path),
            full: Formula::conjunction_of(&lists.full),
            ret: Formula::conjunction_of(&lists.ret),
        }
    }

    pub fn with_aliasing(self, groups: &[BTreeSet<String>]) -> Self {
        Self {
            path: inject_aliasing(self.path, groups),
            full: inject_aliasing(self.full, groups),
            ret: inject_aliasing(self.ret, groups),
        }
    }

    pub fn eliminate_logical_vars(self, oracle: &FormulaOracle) -> Result<Self, OracleError> {
        Ok(Self {
            path: eliminate_logical_vars(self.path, oracle)?,
            full: eliminate_logical_vars(self.full, oracle)?,
            ret: eliminate_logical_vars(self.ret, oracle)?,
        })
    }

    /// Every pass after clause parsing
    pub fn build(
        lists: ClauseLists,
        groups: &[BTreeSet<String>],
        oracle: &FormulaOracle,
    ) -> Result<Self, OracleError> {
        let lists = lists.normalize();
        Self::realize(&lists)
            .with_aliasing(groups)
            .eliminate_logical_vars(oracle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UnknownPolicy;
    use crate::features::clause::ports::{DecisionProcedure, Verdict};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn sym(name: &str) -> Clause {
        Clause::symbol(name)
    }

    fn a_plus_one(name: &str) -> Clause {
        Clause::plus(sym(name), Clause::int(1))
    }

    #[test]
    fn test_rewrite_both_orientations() {
        let clauses = vec![
            Clause::equal(sym("p"), a_plus_one("a1")),
            Clause::equal(a_plus_one("a2"), sym("q")),
            Clause::equal(sym("r"), Clause::plus(sym("v1"), Clause::int(1))),
        ];
        let rewritten = rewrite_restricted_vars(&clauses);
        assert_eq!(
            rewritten,
            vec![
                Clause::not_equal(sym("p"), Clause::int(0)),
                Clause::not_equal(sym("q"), Clause::int(0)),
                clauses[2].clone(),
            ]
        );
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let clauses = vec![
            Clause::equal(sym("p"), a_plus_one("a1")),
            Clause::less_equal(Clause::int(1), sym("p")),
        ];
        let once = rewrite_restricted_vars(&clauses);
        assert_eq!(rewrite_restricted_vars(&once), once);
    }

    #[test]
    fn test_remove_redundant_pointer_clauses() {
        let clauses = vec![
            Clause::not_equal(Clause::int(0), sym("p")),
            Clause::less_equal(Clause::int(1), sym("p")),
            Clause::equal(sym("p"), a_plus_one("a3")),
            Clause::equal(a_plus_one("a4"), sym("p")),
            Clause::less_equal(Clause::int(1), sym("q")),
        ];
        let kept = remove_redundant_pointer_clauses(&clauses);
        assert_eq!(
            kept,
            vec![
                Clause::not_equal(Clause::int(0), sym("p")),
                Clause::less_equal(Clause::int(1), sym("q")),
            ]
        );
    }

    #[test]
    fn test_return_separation() {
        let lists = ClauseLists {
            path: vec![Clause::equal(sym("&(return)"), Clause::int(0))],
            full: vec![
                Clause::equal(sym("&(return)"), Clause::int(0)),
                Clause::equal(sym("&(return->next)"), Clause::int(0)),
            ],
            ret: Vec::new(),
        }
        .normalize();
        assert_eq!(lists.ret.len(), 1);
        assert_eq!(lists.full, vec![Clause::equal(sym("&(return->next)"), Clause::int(0))]);
        assert_eq!(lists.path.len(), 1);
    }

    #[test]
    fn test_aliasing_only_for_touched_groups() {
        let touched: BTreeSet<String> = ["&(p)", "&(q)", "&(r)"].iter().map(|s| s.to_string()).collect();
        let untouched: BTreeSet<String> = ["&(x)", "&(y)"].iter().map(|s| s.to_string()).collect();
        let f = Formula::atom(Clause::equal(sym("&(q)"), Clause::int(0)));
        let aliased = inject_aliasing(f.clone(), [&touched, &untouched]);
        assert_eq!(
            aliased,
            Formula::and(vec![
                f,
                Formula::atom(Clause::equal(sym("&(p)"), sym("&(q)"))),
                Formula::atom(Clause::equal(sym("&(q)"), sym("&(r)"))),
            ])
        );
    }

    #[test]
    fn test_elimination_removes_logical_vars() {
        let oracle = FormulaOracle::default();
        let f = Formula::conjunction_of(&[
            Clause::equal(sym("&(p)"), sym("v4")),
            Clause::less_equal(sym("a1"), sym("v4")),
        ]);
        let eliminated = eliminate_logical_vars(f, &oracle).unwrap();
        let free = eliminated.free_variables();
        assert!(free.iter().all(|v| !is_logical_var(v) && !is_restricted_var(v)));
        // exists a1 >= 0, a1 <= p  <=>  p >= 0
        let expected = Formula::atom(Clause::less_equal(Clause::int(0), sym("&(p)")));
        assert!(oracle.equivalent(&eliminated, &expected).unwrap());
    }

    struct Untranslatable;

    impl DecisionProcedure for Untranslatable {
        fn name(&self) -> &'static str {
            "untranslatable"
        }

        fn check_sat(&self, _formula: &Formula) -> Result<Verdict, OracleError> {
            Ok(Verdict::Sat)
        }

        fn eliminate(&self, _vars: &[String], _formula: &Formula) -> Result<Formula, EliminationError> {
            Err(EliminationError::Untranslatable("(mod v1 2)".to_string()))
        }
    }

    #[test]
    fn test_untranslatable_elimination_falls_back_to_true() {
        let oracle = FormulaOracle::new(Arc::new(Untranslatable), UnknownPolicy::NotEquivalent);
        let f = Formula::atom(Clause::equal(sym("v1"), Clause::int(3)));
        assert_eq!(eliminate_logical_vars(f, &oracle).unwrap(), Formula::True);
    }

    #[test]
    fn test_formula_without_logical_vars_untouched() {
        let oracle = FormulaOracle::default();
        let f = Formula::atom(Clause::not_equal(sym("&(p)"), Clause::int(0)));
        assert_eq!(eliminate_logical_vars(f.clone(), &oracle).unwrap(), f);
    }
}
