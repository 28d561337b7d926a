//! Z3 decision procedure
//!
//! Exact backend over Z3's integer arithmetic. Only available when compiled
//! with `--features z3`.
//!
//! ```bash
//! apt-get install libz3-dev  # Linux
//! brew install z3            # macOS
//! cargo build --release --features z3
//! ```
//!
//! Every query builds its own [`Context`]: contexts are not thread-safe and
//! the port must be callable from several classifications at once.
//! Quantifier elimination runs Z3's `qe` tactic; its output can contain
//! `mod`/`div` terms the clause language has no node for, which is reported
//! as [`EliminationError::Untranslatable`].

#![cfg(feature = "z3")]

use crate::config::OracleConfig;
use crate::features::clause::domain::{Clause, Formula};
use crate::features::clause::ports::{DecisionProcedure, EliminationError, OracleError, Verdict};
use std::collections::HashMap;
use z3::ast::{Ast, Bool, Dynamic, Int};
use z3::{Config, Context, DeclKind, Goal, SatResult, Solver, Tactic};

#[derive(Debug, Clone)]
pub struct Z3Solver {
    timeout_ms: u64,
}

impl Z3Solver {
    pub fn new() -> Self {
        Self::with_timeout(5000)
    }

    pub fn with_timeout(timeout_ms: u64) -> Self {
        Self { timeout_ms }
    }

    pub fn from_config(config: &OracleConfig) -> Self {
        Self::with_timeout(config.timeout_ms)
    }

    fn context(&self) -> Context {
        let mut cfg = Config::new();
        cfg.set_timeout_msec(self.timeout_ms);
        Context::new(&cfg)
    }
}

impl Default for Z3Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionProcedure for Z3Solver {
    fn name(&self) -> &'static str {
        "z3"
    }

    fn check_sat(&self, formula: &Formula) -> Result<Verdict, OracleError> {
        let ctx = self.context();
        let mut encoder = Encoder::new(&ctx);
        let encoded = encoder.formula(formula).map_err(|message| OracleError::Backend {
            backend: self.name().to_string(),
            message,
        })?;

        let solver = Solver::new(&ctx);
        solver.assert(&encoded);
        Ok(match solver.check() {
            SatResult::Sat => Verdict::Sat,
            SatResult::Unsat => Verdict::Unsat,
            SatResult::Unknown => {
                tracing::debug!(
                    "z3: unknown ({})",
                    solver.get_reason_unknown().unwrap_or_default()
                );
                Verdict::Unknown
            }
        })
    }

    fn eliminate(&self, vars: &[String], formula: &Formula) -> Result<Formula, EliminationError> {
        let ctx = self.context();
        let mut encoder = Encoder::new(&ctx);
        let body = encoder
            .formula(formula)
            .map_err(EliminationError::Untranslatable)?;
        let bound: Vec<Int> = vars.iter().map(|v| encoder.var(v)).collect();
        let bound_refs: Vec<&dyn Ast> = bound.iter().map(|b| b as &dyn Ast).collect();
        let quantified = z3::ast::exists_const(&ctx, &bound_refs, &[], &body);

        let goal = Goal::new(&ctx, false, false, false);
        goal.assert(&quantified);
        let applied = Tactic::new(&ctx, "qe")
            .apply(&goal, None)
            .map_err(|message| {
                EliminationError::Backend(OracleError::Backend {
                    backend: self.name().to_string(),
                    message,
                })
            })?;

        let mut disjuncts = Vec::new();
        for subgoal in applied.list_subgoals() {
            let conjuncts = subgoal
                .get_formulas::<Bool>()
                .iter()
                .map(decode_bool)
                .collect::<Result<Vec<_>, _>>()?;
            disjuncts.push(Formula::and(conjuncts));
        }
        Ok(Formula::or(disjuncts))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Formula → Z3
// ═══════════════════════════════════════════════════════════════════════════

struct Encoder<'ctx> {
    ctx: &'ctx Context,
    vars: HashMap<String, Int<'ctx>>,
}

impl<'ctx> Encoder<'ctx> {
    fn new(ctx: &'ctx Context) -> Self {
        Self {
            ctx,
            vars: HashMap::new(),
        }
    }

    fn var(&mut self, name: &str) -> Int<'ctx> {
        self.vars
            .entry(name.to_string())
            .or_insert_with(|| Int::new_const(self.ctx, name))
            .clone()
    }

    fn term(&mut self, clause: &Clause) -> Result<Int<'ctx>, String> {
        Ok(match clause {
            Clause::Int(value) => Int::from_i64(self.ctx, *value),
            Clause::Symbol(name) => self.var(name),
            Clause::Plus(l, r) => {
                let (l, r) = (self.term(l)?, self.term(r)?);
                Int::add(self.ctx, &[&l, &r])
            }
            Clause::Times(l, r) => {
                let (l, r) = (self.term(l)?, self.term(r)?);
                Int::mul(self.ctx, &[&l, &r])
            }
            other => return Err(format!("relation used as a term: {}", other)),
        })
    }

    fn atom(&mut self, clause: &Clause) -> Result<Bool<'ctx>, String> {
        Ok(match clause {
            Clause::True => Bool::from_bool(self.ctx, true),
            Clause::Equal(l, r) => self.term(l)?._eq(&self.term(r)?),
            Clause::NotEqual(l, r) => self.term(l)?._eq(&self.term(r)?).not(),
            Clause::LessEqual(l, r) => self.term(l)?.le(&self.term(r)?),
            Clause::LessThan(l, r) => self.term(l)?.lt(&self.term(r)?),
            other => return Err(format!("term used as an atom: {}", other)),
        })
    }

    fn formula(&mut self, formula: &Formula) -> Result<Bool<'ctx>, String> {
        Ok(match formula {
            Formula::True => Bool::from_bool(self.ctx, true),
            Formula::False => Bool::from_bool(self.ctx, false),
            Formula::Atom(clause) => self.atom(clause)?,
            Formula::Not(inner) => self.formula(inner)?.not(),
            Formula::And(parts) | Formula::Or(parts) => {
                let encoded = parts
                    .iter()
                    .map(|p| self.formula(p))
                    .collect::<Result<Vec<_>, _>>()?;
                let refs: Vec<&Bool> = encoded.iter().collect();
                if matches!(formula, Formula::And(_)) {
                    Bool::and(self.ctx, &refs)
                } else {
                    Bool::or(self.ctx, &refs)
                }
            }
            Formula::Iff(l, r) => self.formula(l)?.iff(&self.formula(r)?),
            Formula::Exists(vars, body) => {
                let body = self.formula(body)?;
                let bound: Vec<Int> = vars.iter().map(|v| self.var(v)).collect();
                let refs: Vec<&dyn Ast> = bound.iter().map(|b| b as &dyn Ast).collect();
                z3::ast::exists_const(self.ctx, &refs, &[], &body)
            }
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Z3 → Formula
// ═══════════════════════════════════════════════════════════════════════════

fn untranslatable(ast: &impl Ast<'_>) -> EliminationError {
    EliminationError::Untranslatable(format!("{:?}", ast))
}

fn bool_children<'c>(ast: &Bool<'c>) -> Result<Vec<Formula>, EliminationError> {
    ast.children()
        .iter()
        .map(|child| child.as_bool().ok_or_else(|| untranslatable(child)).and_then(|b| decode_bool(&b)))
        .collect()
}

fn int_pair<'c>(ast: &Bool<'c>) -> Result<(Clause, Clause), EliminationError> {
    let children: Vec<Dynamic> = ast.children();
    let [lhs, rhs] = children.as_slice() else {
        return Err(untranslatable(ast));
    };
    let decode = |d: &Dynamic<'c>| d.as_int().ok_or_else(|| untranslatable(d)).and_then(|i| decode_int(&i));
    Ok((decode(lhs)?, decode(rhs)?))
}

fn decode_bool(ast: &Bool<'_>) -> Result<Formula, EliminationError> {
    Ok(match ast.decl().kind() {
        DeclKind::TRUE => Formula::True,
        DeclKind::FALSE => Formula::False,
        DeclKind::AND => Formula::and(bool_children(ast)?),
        DeclKind::OR => Formula::or(bool_children(ast)?),
        DeclKind::NOT => {
            let mut inner = bool_children(ast)?;
            match inner.pop() {
                Some(f) if inner.is_empty() => Formula::not(f),
                _ => return Err(untranslatable(ast)),
            }
        }
        DeclKind::IFF => {
            let mut parts = bool_children(ast)?;
            match (parts.pop(), parts.pop()) {
                (Some(r), Some(l)) if parts.is_empty() => Formula::iff(l, r),
                _ => return Err(untranslatable(ast)),
            }
        }
        DeclKind::EQ | DeclKind::DISTINCT => {
            let (l, r) = int_pair(ast)?;
            if ast.decl().kind() == DeclKind::EQ {
                Formula::atom(Clause::equal(l, r))
            } else {
                Formula::atom(Clause::not_equal(l, r))
            }
        }
        DeclKind::LE => {
            let (l, r) = int_pair(ast)?;
            Formula::atom(Clause::less_equal(l, r))
        }
        DeclKind::LT => {
            let (l, r) = int_pair(ast)?;
            Formula::atom(Clause::less_than(l, r))
        }
        DeclKind::GE => {
            let (l, r) = int_pair(ast)?;
            Formula::atom(Clause::less_equal(r, l))
        }
        DeclKind::GT => {
            let (l, r) = int_pair(ast)?;
            Formula::atom(Clause::less_than(r, l))
        }
        _ => return Err(untranslatable(ast)),
    })
}

fn decode_int(ast: &Int<'_>) -> Result<Clause, EliminationError> {
    let children = || -> Result<Vec<Clause>, EliminationError> {
        ast.children()
            .iter()
            .map(|c| c.as_int().ok_or_else(|| untranslatable(c)).and_then(|i| decode_int(&i)))
            .collect()
    };
    let fold = |parts: Vec<Clause>, op: fn(Clause, Clause) -> Clause| {
        let mut iter = parts.into_iter();
        let first = iter.next().ok_or_else(|| untranslatable(ast))?;
        Ok::<Clause, EliminationError>(iter.fold(first, op))
    };

    match ast.decl().kind() {
        DeclKind::ANUM => ast.as_i64().map(Clause::Int).ok_or_else(|| untranslatable(ast)),
        DeclKind::UNINTERPRETED if ast.num_children() == 0 => Ok(Clause::symbol(ast.decl().name())),
        DeclKind::ADD => fold(children()?, Clause::plus),
        DeclKind::MUL => fold(children()?, Clause::times),
        DeclKind::UMINUS => {
            let inner = fold(children()?, Clause::plus)?;
            Ok(Clause::times(Clause::int(-1), inner))
        }
        DeclKind::SUB => {
            let mut parts = children()?.into_iter();
            let first = parts.next().ok_or_else(|| untranslatable(ast))?;
            Ok(parts.fold(first, |acc, p| {
                Clause::plus(acc, Clause::times(Clause::int(-1), p))
            }))
        }
        _ => Err(untranslatable(ast)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_z3_unsat() {
        let solver = Z3Solver::new();
        let f = Formula::and(vec![
            Formula::atom(Clause::equal(Clause::symbol("x"), Clause::int(0))),
            Formula::atom(Clause::not_equal(Clause::symbol("x"), Clause::int(0))),
        ]);
        assert_eq!(solver.check_sat(&f).unwrap(), Verdict::Unsat);
    }

    #[test]
    fn test_z3_eliminate_witness() {
        let solver = Z3Solver::new();
        let body = Formula::and(vec![
            Formula::atom(Clause::less_equal(Clause::int(0), Clause::symbol("a1"))),
            Formula::atom(Clause::equal(
                Clause::symbol("x"),
                Clause::plus(Clause::symbol("a1"), Clause::int(1)),
            )),
        ]);
        let result = solver.eliminate(&["a1".to_string()], &body).unwrap();
        assert!(!result.free_variables().contains("a1"));
    }
}
