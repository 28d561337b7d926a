//! Lightweight decision procedure
//!
//! Pure-Rust procedure for quantifier-free linear integer arithmetic, the
//! only theory the clause language produces.
//!
//! ## Satisfiability
//!
//! ```text
//! Formula ──NNF──▶ And/Or tree of constraints (=, ≤, ≠ against 0)
//!            │
//!            ├─ literals of the current branch are checked eagerly (pruning)
//!            └─ first open disjunction is split, children searched in order
//!
//! conjunction check:
//!   1. unit-coefficient equalities are solved and substituted away
//!   2. remaining equalities become two opposite inequalities
//!   3. disequalities on otherwise unconstrained variables are dropped,
//!      the rest are split into `e ≤ -1 ∨ -e ≤ -1`
//!   4. Fourier-Motzkin elimination with gcd tightening
//! ```
//!
//! Fourier-Motzkin is exact over the integers only when every eliminated
//! variable has unit coefficients on one side of its bounds. Otherwise a
//! feasible result is reported as `Unknown` rather than `Sat`. Running out
//! of branches, constraints or time also yields `Unknown`.
//!
//! ## Quantifier elimination
//!
//! The body is put in DNF and every cube is projected independently:
//! unit equalities are substituted, disequalities on the eliminated variable
//! are split, and inequalities are combined by Fourier-Motzkin. A projection
//! that would be inexact (non-unit equality, or non-unit bounds on both
//! sides) is reported as `Untranslatable`.

use super::linear::{variables_of, Constraint, LinExpr, LinearError, Normalized, Rel};
use crate::config::OracleConfig;
use crate::features::clause::domain::Formula;
use crate::features::clause::ports::{DecisionProcedure, EliminationError, OracleError, Verdict};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct LightweightSolver {
    timeout: Duration,
    max_branches: usize,
    max_constraints: usize,
}

impl Default for LightweightSolver {
    fn default() -> Self {
        Self::from_config(&OracleConfig::default())
    }
}

impl LightweightSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &OracleConfig) -> Self {
        Self {
            timeout: Duration::from_millis(config.timeout_ms),
            max_branches: config.max_branches,
            max_constraints: config.max_constraints,
        }
    }
}

impl DecisionProcedure for LightweightSolver {
    fn name(&self) -> &'static str {
        "lightweight"
    }

    fn check_sat(&self, formula: &Formula) -> Result<Verdict, OracleError> {
        let mut builder = NnfBuilder::default();
        let nnf = match builder.build(formula, true, &BTreeMap::new()) {
            Ok(nnf) => nnf,
            Err(reason) => {
                tracing::debug!("lightweight: {} in {}", reason, formula);
                return Ok(Verdict::Unknown);
            }
        };

        let mut search = Search::new(self);
        let verdict = match search.formula(vec![&nnf], Vec::new()) {
            Ok(verdict) => verdict,
            Err(e) => {
                tracing::debug!("lightweight: {}", e);
                Verdict::Unknown
            }
        };
        if verdict == Verdict::Unknown {
            tracing::debug!(
                "lightweight: inconclusive after {} branches",
                search.branches
            );
        }
        Ok(verdict)
    }

    fn eliminate(&self, vars: &[String], formula: &Formula) -> Result<Formula, EliminationError> {
        let mut builder = NnfBuilder::default();
        let nnf = builder
            .build(formula, true, &BTreeMap::new())
            .map_err(|reason| EliminationError::Untranslatable(reason.to_string()))?;

        let mut eliminated: Vec<String> = vars.to_vec();
        eliminated.extend(builder.bound);
        eliminated.sort();
        eliminated.dedup();

        let cubes = dnf(&nnf, self.max_constraints)?;
        let mut projection = Projection::new(self);
        for cube in cubes {
            projection.project(cube, &eliminated)?;
        }

        let mut disjuncts = Vec::with_capacity(projection.cubes.len());
        for cube in projection.cubes {
            let mut atoms = Vec::with_capacity(cube.len());
            for constraint in &cube {
                let clause = constraint
                    .to_clause()
                    .map_err(|e| EliminationError::Untranslatable(e.to_string()))?;
                atoms.push(Formula::atom(clause));
            }
            disjuncts.push(Formula::and(atoms));
        }
        Ok(Formula::or(disjuncts))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Negation normal form
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
enum Nnf {
    Const(bool),
    Lit(Constraint),
    And(Vec<Nnf>),
    Or(Vec<Nnf>),
}

#[derive(Debug, thiserror::Error)]
enum NnfError {
    #[error("{0}")]
    Linear(#[from] LinearError),

    #[error("universal quantifier")]
    Universal,
}

#[derive(Default)]
struct NnfBuilder {
    fresh: usize,
    /// Renamed existential variables encountered in positive position
    bound: Vec<String>,
}

impl NnfBuilder {
    fn build(
        &mut self,
        formula: &Formula,
        positive: bool,
        renames: &BTreeMap<String, String>,
    ) -> Result<Nnf, NnfError> {
        Ok(match formula {
            Formula::True => Nnf::Const(positive),
            Formula::False => Nnf::Const(!positive),
            Formula::Atom(clause) => match Constraint::from_atom(clause, positive)? {
                Normalized::Trivial(value) => Nnf::Const(value),
                Normalized::Constraint(c) => Nnf::Lit(c.rename(renames)),
            },
            Formula::Not(inner) => self.build(inner, !positive, renames)?,
            Formula::And(parts) | Formula::Or(parts) => {
                let children = parts
                    .iter()
                    .map(|p| self.build(p, positive, renames))
                    .collect::<Result<Vec<_>, _>>()?;
                let conjunctive = matches!(formula, Formula::And(_)) == positive;
                if conjunctive {
                    Nnf::And(children)
                } else {
                    Nnf::Or(children)
                }
            }
            Formula::Iff(lhs, rhs) => {
                let l_pos = self.build(lhs, true, renames)?;
                let l_neg = self.build(lhs, false, renames)?;
                let r_pos = self.build(rhs, true, renames)?;
                let r_neg = self.build(rhs, false, renames)?;
                if positive {
                    Nnf::Or(vec![Nnf::And(vec![l_pos, r_pos]), Nnf::And(vec![l_neg, r_neg])])
                } else {
                    Nnf::Or(vec![Nnf::And(vec![l_pos, r_neg]), Nnf::And(vec![l_neg, r_pos])])
                }
            }
            Formula::Exists(vars, body) => {
                if !positive {
                    return Err(NnfError::Universal);
                }
                let mut scoped = renames.clone();
                for var in vars {
                    let fresh = format!("{}!{}", var, self.fresh);
                    self.fresh += 1;
                    self.bound.push(fresh.clone());
                    scoped.insert(var.clone(), fresh);
                }
                self.build(body, true, &scoped)?
            }
        })
    }
}

/// Cubes of `nnf`, failing once more than `limit` are produced
fn dnf(nnf: &Nnf, limit: usize) -> Result<Vec<Vec<Constraint>>, EliminationError> {
    let too_large = || EliminationError::Untranslatable(format!("DNF exceeds {} cubes", limit));
    Ok(match nnf {
        Nnf::Const(true) => vec![Vec::new()],
        Nnf::Const(false) => Vec::new(),
        Nnf::Lit(c) => vec![vec![c.clone()]],
        Nnf::Or(parts) => {
            let mut cubes = Vec::new();
            for part in parts {
                cubes.extend(dnf(part, limit)?);
                if cubes.len() > limit {
                    return Err(too_large());
                }
            }
            cubes
        }
        Nnf::And(parts) => {
            let mut cubes: Vec<Vec<Constraint>> = vec![Vec::new()];
            for part in parts {
                let right = dnf(part, limit)?;
                let mut product = Vec::with_capacity(cubes.len() * right.len());
                for left in &cubes {
                    for r in &right {
                        let mut cube = left.clone();
                        cube.extend(r.iter().cloned());
                        product.push(cube);
                    }
                }
                if product.len() > limit {
                    return Err(too_large());
                }
                cubes = product;
            }
            cubes
        }
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// Satisfiability search
// ═══════════════════════════════════════════════════════════════════════════

struct Search<'s> {
    solver: &'s LightweightSolver,
    deadline: Instant,
    branches: usize,
}

impl<'s> Search<'s> {
    fn new(solver: &'s LightweightSolver) -> Self {
        Self {
            solver,
            deadline: Instant::now() + solver.timeout,
            branches: 0,
        }
    }

    /// Charge one branch; `false` once any budget is spent
    fn charge(&mut self) -> bool {
        self.branches += 1;
        self.branches <= self.solver.max_branches && Instant::now() < self.deadline
    }

    fn formula<'n>(
        &mut self,
        mut pending: Vec<&'n Nnf>,
        mut literals: Vec<Constraint>,
    ) -> Result<Verdict, LinearError> {
        let mut disjunctions: Vec<&'n Nnf> = Vec::new();
        while let Some(node) = pending.pop() {
            match node {
                Nnf::Const(true) => {}
                Nnf::Const(false) => return Ok(Verdict::Unsat),
                Nnf::Lit(c) => literals.push(c.clone()),
                Nnf::And(parts) => pending.extend(parts.iter()),
                Nnf::Or(_) => disjunctions.push(node),
            }
        }

        let theory = self.conjunction(literals.clone())?;
        if theory == Verdict::Unsat || disjunctions.is_empty() {
            return Ok(theory);
        }

        let Some((Nnf::Or(choices), rest)) = disjunctions.split_first().map(|(f, r)| (*f, r)) else {
            return Ok(theory);
        };

        let mut inconclusive = false;
        for choice in choices {
            if !self.charge() {
                return Ok(Verdict::Unknown);
            }
            let mut next: Vec<&Nnf> = rest.to_vec();
            next.push(choice);
            match self.formula(next, literals.clone())? {
                Verdict::Sat => return Ok(Verdict::Sat),
                Verdict::Unknown => inconclusive = true,
                Verdict::Unsat => {}
            }
        }
        Ok(if inconclusive {
            Verdict::Unknown
        } else {
            Verdict::Unsat
        })
    }

    fn conjunction(&mut self, literals: Vec<Constraint>) -> Result<Verdict, LinearError> {
        let Some(mut constraints) = solve_unit_equalities(literals, &[])? else {
            return Ok(Verdict::Unsat);
        };

        let mut inequalities = Vec::new();
        let mut disequalities = Vec::new();
        for c in constraints.drain(..) {
            match c.rel {
                Rel::Le => inequalities.push(c),
                Rel::Ne => disequalities.push(c),
                Rel::Eq => {
                    let negated = Constraint::new(c.expr.scale(-1)?, Rel::Le);
                    inequalities.push(Constraint::new(c.expr, Rel::Le));
                    match negated.normalize() {
                        Normalized::Constraint(n) => inequalities.push(n),
                        Normalized::Trivial(false) => return Ok(Verdict::Unsat),
                        Normalized::Trivial(true) => {}
                    }
                }
            }
        }
        drop_free_disequalities(&inequalities, &mut disequalities);
        self.with_disequalities(inequalities, disequalities)
    }

    fn with_disequalities(
        &mut self,
        inequalities: Vec<Constraint>,
        mut disequalities: Vec<Constraint>,
    ) -> Result<Verdict, LinearError> {
        let base = self.fourier_motzkin(inequalities.clone())?;
        let Some(split) = disequalities.pop() else {
            return Ok(base);
        };
        if base == Verdict::Unsat {
            return Ok(Verdict::Unsat);
        }

        let mut inconclusive = false;
        for side in split.split_disequality()? {
            if !self.charge() {
                return Ok(Verdict::Unknown);
            }
            let mut branch = inequalities.clone();
            match side {
                Normalized::Trivial(false) => continue,
                Normalized::Trivial(true) => {}
                Normalized::Constraint(c) => branch.push(c),
            }
            match self.with_disequalities(branch, disequalities.clone())? {
                Verdict::Sat => return Ok(Verdict::Sat),
                Verdict::Unknown => inconclusive = true,
                Verdict::Unsat => {}
            }
        }
        Ok(if inconclusive {
            Verdict::Unknown
        } else {
            Verdict::Unsat
        })
    }

    fn fourier_motzkin(&mut self, mut constraints: Vec<Constraint>) -> Result<Verdict, LinearError> {
        let mut exact = true;
        loop {
            dedup(&mut constraints);
            let Some(var) = cheapest_variable(&constraints) else {
                return Ok(if exact { Verdict::Sat } else { Verdict::Unknown });
            };
            if constraints.len() > self.solver.max_constraints || Instant::now() >= self.deadline {
                return Ok(Verdict::Unknown);
            }
            match eliminate_bounds(constraints, &var)? {
                Elimination::Infeasible => return Ok(Verdict::Unsat),
                Elimination::Projected { constraints: rest, exact: e } => {
                    exact &= e;
                    constraints = rest;
                }
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Quantifier elimination
// ═══════════════════════════════════════════════════════════════════════════

struct Projection<'s> {
    solver: &'s LightweightSolver,
    deadline: Instant,
    cubes: Vec<Vec<Constraint>>,
}

impl<'s> Projection<'s> {
    fn new(solver: &'s LightweightSolver) -> Self {
        Self {
            solver,
            deadline: Instant::now() + solver.timeout,
            cubes: Vec::new(),
        }
    }

    fn untranslatable(reason: impl Into<String>) -> EliminationError {
        EliminationError::Untranslatable(reason.into())
    }

    fn project(&mut self, cube: Vec<Constraint>, vars: &[String]) -> Result<(), EliminationError> {
        let linear = |e: LinearError| Self::untranslatable(e.to_string());
        if Instant::now() >= self.deadline {
            return Err(Self::untranslatable("time budget exhausted"));
        }

        let Some(mut cube) = solve_unit_equalities(cube, vars).map_err(linear)? else {
            return Ok(());
        };

        for (index, var) in vars.iter().enumerate() {
            if !cube.iter().any(|c| c.mentions(var)) {
                continue;
            }
            if cube.iter().any(|c| c.rel == Rel::Eq && c.mentions(var)) {
                return Err(Self::untranslatable(format!(
                    "non-unit equality on {}",
                    var
                )));
            }

            if let Some(pos) = cube.iter().position(|c| c.rel == Rel::Ne && c.mentions(var)) {
                let disequality = cube.remove(pos);
                for side in disequality.split_disequality().map_err(linear)? {
                    let mut branch = cube.clone();
                    match side {
                        Normalized::Trivial(false) => continue,
                        Normalized::Trivial(true) => {}
                        Normalized::Constraint(c) => branch.push(c),
                    }
                    self.project(branch, &vars[index..])?;
                }
                return Ok(());
            }

            match eliminate_bounds(cube, var).map_err(linear)? {
                Elimination::Infeasible => return Ok(()),
                Elimination::Projected { exact: false, .. } => {
                    return Err(Self::untranslatable(format!(
                        "inexact integer projection of {}",
                        var
                    )));
                }
                Elimination::Projected { constraints, .. } => cube = constraints,
            }
            dedup(&mut cube);
            if cube.len() > self.solver.max_constraints {
                return Err(Self::untranslatable("constraint budget exhausted"));
            }
        }

        dedup(&mut cube);
        if !self.cubes.contains(&cube) {
            self.cubes.push(cube);
        }
        if self.cubes.len() > self.solver.max_constraints {
            return Err(Self::untranslatable("cube budget exhausted"));
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Shared steps
// ═══════════════════════════════════════════════════════════════════════════

/// Substitute away every equality with a unit coefficient
///
/// When `only` is non-empty, just those variables are solved for. Returns
/// `None` when a substitution produces a contradiction.
fn solve_unit_equalities(
    mut constraints: Vec<Constraint>,
    only: &[String],
) -> Result<Option<Vec<Constraint>>, LinearError> {
    loop {
        let pivot = constraints.iter().enumerate().find_map(|(i, c)| {
            if c.rel != Rel::Eq {
                return None;
            }
            c.expr
                .coeffs
                .iter()
                .find(|(var, coeff)| coeff.abs() == 1 && (only.is_empty() || only.contains(var)))
                .map(|(var, coeff)| (i, var.clone(), *coeff))
        });
        let Some((index, var, coeff)) = pivot else {
            return Ok(Some(constraints));
        };

        let equality = constraints.remove(index);
        // coeff·var + rest = 0  ⇒  var = -coeff·rest
        let mut rest: LinExpr = equality.expr;
        rest.coeffs.remove(&var);
        let value = rest.scale(-coeff)?;

        let mut substituted = Vec::with_capacity(constraints.len());
        for c in &constraints {
            match c.substitute(&var, &value)? {
                Normalized::Trivial(true) => {}
                Normalized::Trivial(false) => return Ok(None),
                Normalized::Constraint(n) => substituted.push(n),
            }
        }
        constraints = substituted;
    }
}

/// Drop disequalities containing a variable no other constraint mentions
fn drop_free_disequalities(inequalities: &[Constraint], disequalities: &mut Vec<Constraint>) {
    loop {
        let before = disequalities.len();
        let snapshot = disequalities.clone();
        disequalities.retain(|d| {
            !d.expr.variables().any(|var| {
                !inequalities.iter().any(|c| c.mentions(var))
                    && !snapshot.iter().any(|o| o != d && o.mentions(var))
            })
        });
        if disequalities.len() == before {
            return;
        }
    }
}

fn cheapest_variable(constraints: &[Constraint]) -> Option<String> {
    variables_of(constraints).into_iter().min_by_key(|var| {
        let lowers = constraints.iter().filter(|c| c.expr.coefficient(var) < 0).count();
        let uppers = constraints.iter().filter(|c| c.expr.coefficient(var) > 0).count();
        lowers * uppers
    })
}

enum Elimination {
    Infeasible,
    Projected {
        constraints: Vec<Constraint>,
        exact: bool,
    },
}

/// One Fourier-Motzkin step on `var` over `≤` constraints
///
/// Constraints of other relations that mention `var` must have been
/// removed by the caller; they are passed through untouched otherwise.
fn eliminate_bounds(constraints: Vec<Constraint>, var: &str) -> Result<Elimination, LinearError> {
    let mut lowers = Vec::new();
    let mut uppers = Vec::new();
    let mut rest = Vec::new();
    for c in constraints {
        let coeff = c.expr.coefficient(var);
        if c.rel != Rel::Le || coeff == 0 {
            rest.push(c);
        } else if coeff > 0 {
            uppers.push(c);
        } else {
            lowers.push(c);
        }
    }

    // unbounded on one side: every bound is satisfiable by moving `var`
    if lowers.is_empty() || uppers.is_empty() {
        return Ok(Elimination::Projected {
            constraints: rest,
            exact: true,
        });
    }

    let exact = lowers.iter().all(|c| c.expr.coefficient(var) == -1)
        || uppers.iter().all(|c| c.expr.coefficient(var) == 1);

    for upper in &uppers {
        let a = upper.expr.coefficient(var);
        for lower in &lowers {
            let b = -lower.expr.coefficient(var);
            let combined = upper.expr.scale(b)?.add(&lower.expr.scale(a)?)?;
            match Constraint::new(combined, Rel::Le).normalize() {
                Normalized::Trivial(true) => {}
                Normalized::Trivial(false) => return Ok(Elimination::Infeasible),
                Normalized::Constraint(c) => rest.push(c),
            }
        }
    }
    Ok(Elimination::Projected {
        constraints: rest,
        exact,
    })
}

fn dedup(constraints: &mut Vec<Constraint>) {
    let mut seen = Vec::with_capacity(constraints.len());
    constraints.retain(|c| {
        if seen.contains(c) {
            false
        } else {
            seen.push(c.clone());
            true
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::clause::domain::Clause;

    fn sym(name: &str) -> Clause {
        Clause::symbol(name)
    }

    fn atom(clause: Clause) -> Formula {
        Formula::atom(clause)
    }

    fn sat(formula: &Formula) -> Verdict {
        LightweightSolver::new().check_sat(formula).unwrap()
    }

    #[test]
    fn test_contradictory_bounds_unsat() {
        let f = Formula::and(vec![
            atom(Clause::less_equal(sym("x"), Clause::int(0))),
            atom(Clause::less_than(Clause::int(0), sym("x"))),
        ]);
        assert_eq!(sat(&f), Verdict::Unsat);
    }

    #[test]
    fn test_disequality_and_equality_unsat() {
        let f = Formula::and(vec![
            atom(Clause::not_equal(sym("p"), Clause::int(0))),
            atom(Clause::equal(sym("p"), sym("q"))),
            atom(Clause::equal(sym("q"), Clause::int(0))),
        ]);
        assert_eq!(sat(&f), Verdict::Unsat);
    }

    #[test]
    fn test_integer_gap_unsat() {
        // 0 < 2x < 2 has a rational but no integer solution
        let two_x = Clause::times(Clause::int(2), sym("x"));
        let f = Formula::and(vec![
            atom(Clause::less_than(Clause::int(0), two_x.clone())),
            atom(Clause::less_than(two_x, Clause::int(2))),
        ]);
        assert_eq!(sat(&f), Verdict::Unsat);
    }

    #[test]
    fn test_disjunction_finds_model() {
        let f = Formula::and(vec![
            atom(Clause::equal(sym("x"), Clause::int(0))),
            Formula::or(vec![
                atom(Clause::not_equal(sym("x"), Clause::int(0))),
                atom(Clause::less_equal(sym("x"), Clause::int(5))),
            ]),
        ]);
        assert_eq!(sat(&f), Verdict::Sat);
    }

    #[test]
    fn test_disequality_split_unsat() {
        // 0 <= x <= 1, x != 0, x != 1
        let f = Formula::and(vec![
            atom(Clause::less_equal(Clause::int(0), sym("x"))),
            atom(Clause::less_equal(sym("x"), Clause::int(1))),
            atom(Clause::not_equal(sym("x"), Clause::int(0))),
            atom(Clause::not_equal(sym("x"), Clause::int(1))),
        ]);
        assert_eq!(sat(&f), Verdict::Unsat);
    }

    #[test]
    fn test_iff_negation_of_identical_is_unsat() {
        let f = atom(Clause::equal(sym("x"), Clause::int(3)));
        let query = Formula::Not(Box::new(Formula::Iff(Box::new(f.clone()), Box::new(f))));
        assert_eq!(sat(&query), Verdict::Unsat);
    }

    #[test]
    fn test_non_linear_is_unknown() {
        let f = atom(Clause::equal(Clause::times(sym("x"), sym("y")), Clause::int(1)));
        assert_eq!(sat(&f), Verdict::Unknown);
    }

    #[test]
    fn test_eliminate_through_equality() {
        // exists v1. x = v1 /\ v1 = 0   ==>   x = 0
        let body = Formula::and(vec![
            atom(Clause::equal(sym("x"), sym("v1"))),
            atom(Clause::equal(sym("v1"), Clause::int(0))),
        ]);
        let solver = LightweightSolver::new();
        let result = solver.eliminate(&["v1".to_string()], &body).unwrap();
        assert_eq!(result.to_string(), "x = 0");
    }

    #[test]
    fn test_eliminate_restricted_witness() {
        // exists a1. a1 >= 0 /\ x = a1 + 1   ==>   x >= 1
        let body = Formula::and(vec![
            atom(Clause::less_equal(Clause::int(0), sym("a1"))),
            atom(Clause::equal(sym("x"), Clause::plus(sym("a1"), Clause::int(1)))),
        ]);
        let solver = LightweightSolver::new();
        let result = solver.eliminate(&["a1".to_string()], &body).unwrap();
        assert!(!result.free_variables().contains("a1"));

        let expected = atom(Clause::less_equal(Clause::int(1), sym("x")));
        let differ = Formula::not(Formula::iff(result, expected));
        assert_eq!(solver.check_sat(&differ).unwrap(), Verdict::Unsat);
    }

    #[test]
    fn test_eliminate_unbounded_disequality_is_true() {
        let body = atom(Clause::not_equal(sym("v3"), sym("x")));
        let solver = LightweightSolver::new();
        let result = solver.eliminate(&["v3".to_string()], &body).unwrap();
        assert_eq!(result, Formula::True);
    }

    #[test]
    fn test_eliminate_non_unit_equality_untranslatable() {
        let body = atom(Clause::equal(
            Clause::times(Clause::int(2), sym("v1")),
            sym("x"),
        ));
        let solver = LightweightSolver::new();
        assert!(matches!(
            solver.eliminate(&["v1".to_string()], &body),
            Err(EliminationError::Untranslatable(_))
        ));
    }

    #[test]
    fn test_budget_exhaustion_is_unknown() {
        let config = OracleConfig {
            max_branches: 1,
            ..OracleConfig::default()
        };
        let solver = LightweightSolver::from_config(&config);
        let disjunction = |name: &str| {
            Formula::or(vec![
                atom(Clause::equal(sym(name), Clause::int(0))),
                atom(Clause::equal(sym(name), Clause::int(1))),
            ])
        };
        let f = Formula::and(vec![
            disjunction("x"),
            disjunction("y"),
            atom(Clause::equal(Clause::plus(sym("x"), sym("y")), Clause::int(5))),
        ]);
        assert_eq!(solver.check_sat(&f).unwrap(), Verdict::Unknown);
    }
}
