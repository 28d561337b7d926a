//! Disjunct and summary parsing
//!
//! ```text
//! RawDisjunct
//!   ├─ label                          → DisjunctLabel
//!   ├─ post       → StateResolver     → alias map, allocated / deallocated
//!   └─ path_condition
//!        both.atoms (≠ Equal) ┐
//!        both.linear_eqs      ┴→ full clauses ┐
//!        pruned               ──→ path clauses ┴→ FormulaCollection::build
//! ```
//!
//! Symbols are named through the alias map: the representative alias of an
//! lvar when it has one, the raw lvar otherwise.

use crate::errors::Result;
use crate::features::clause::application::{ClauseLists, FormulaCollection, FormulaOracle};
use crate::features::clause::domain::{Clause, ClauseError, LinearTerm, Operand, RelationKind};
use crate::features::disjunct::domain::{
    Atom, DisjunctLabel, LinArith, PathCondition, RawDisjunct, Term,
};
use crate::features::equivalence::domain::{DisjunctSignature, PatchSignature};
use crate::features::heap_resolution::application::{ResolvedState, StateResolver};
use rayon::prelude::*;
use std::path::Path;

/// Parse a summary document (JSON array of disjuncts)
pub fn parse_summary_str(text: &str) -> Result<Vec<RawDisjunct>> {
    Ok(serde_json::from_str(text)?)
}

pub fn read_summary(path: impl AsRef<Path>) -> Result<Vec<RawDisjunct>> {
    let text = std::fs::read_to_string(path.as_ref())?;
    parse_summary_str(&text)
}

#[derive(Debug, Clone, Default)]
pub struct DisjunctParser {
    oracle: FormulaOracle,
    resolver: StateResolver,
}

impl DisjunctParser {
    pub fn new(oracle: FormulaOracle) -> Self {
        Self {
            oracle,
            resolver: StateResolver::new(),
        }
    }

    pub fn oracle(&self) -> &FormulaOracle {
        &self.oracle
    }

    /// Full parse into a signature
    ///
    /// A disjunct without content yields the trivial signature.
    pub fn parse(&self, raw: &RawDisjunct) -> Result<DisjunctSignature> {
        let label = raw.label()?;
        let Some(content) = raw.content() else {
            tracing::debug!("{} has no post-state; using trivial signature", label);
            return Ok(DisjunctSignature::trivial(label));
        };

        let resolved = self.resolver.resolve(&content.post.decode());
        let lists = clause_lists(&content.path_condition.decode(), &resolved);
        let formulas = FormulaCollection::build(lists, &resolved.alias_groups(), &self.oracle)?;

        Ok(DisjunctSignature::new(
            label,
            resolved.allocated,
            resolved.deallocated,
            formulas.ret,
            formulas.full,
        ))
    }

    /// Label and executed lines only; no state or formula work
    pub fn parse_trace(&self, raw: &RawDisjunct) -> Result<(DisjunctLabel, Vec<i64>)> {
        Ok((raw.label()?, raw.trace()))
    }
}

fn linear_terms(arith: &LinArith, resolved: &ResolvedState) -> Vec<LinearTerm> {
    arith
        .vars
        .iter()
        .map(|(lvar, coefficient)| LinearTerm::var(resolved.name_of(lvar), *coefficient))
        .chain(std::iter::once(LinearTerm::constant(arith.constant)))
        .collect()
}

fn operand(term: &Term, resolved: &ResolvedState) -> Operand {
    match term {
        Term::Const(value) => Operand::Const(*value),
        Term::Linear(arith) => Operand::Linear(linear_terms(arith, resolved)),
    }
}

fn atom_clause(atom: &Atom, resolved: &ResolvedState) -> std::result::Result<Clause, ClauseError> {
    Clause::relation(
        &atom.kind,
        &operand(&atom.lhs, resolved),
        &operand(&atom.rhs, resolved),
    )
}

fn keep_built(built: std::result::Result<Clause, ClauseError>) -> Option<Clause> {
    match built {
        Ok(clause) => Some(clause),
        Err(e) => {
            tracing::debug!("Skipping atom: {}", e);
            None
        }
    }
}

/// Clause lists of one path condition
///
/// Equalities among `both.atoms` are already covered by `linear_eqs`.
pub fn clause_lists(pc: &PathCondition, resolved: &ResolvedState) -> ClauseLists {
    let mut lists = ClauseLists::new();
    lists.extend_full(
        pc.atoms
            .iter()
            .filter(|atom| atom.kind != RelationKind::Equal)
            .filter_map(|atom| keep_built(atom_clause(atom, resolved))),
    );
    lists.extend_full(pc.linear_eqs.iter().filter_map(|eq| {
        keep_built(Clause::equality_to_symbol(
            &resolved.name_of(&eq.lhs),
            &linear_terms(&eq.rhs, resolved),
        ))
    }));
    lists.extend_path(
        pc.pruned
            .iter()
            .filter_map(|atom| keep_built(atom_clause(atom, resolved))),
    );
    lists
}

/// Whole-summary parsing into a reduced [`PatchSignature`]
///
/// Disjuncts are parsed in parallel; absorption keeps summary order.
#[derive(Debug, Clone, Default)]
pub struct SummaryParser {
    disjuncts: DisjunctParser,
}

impl SummaryParser {
    pub fn new(oracle: FormulaOracle) -> Self {
        Self {
            disjuncts: DisjunctParser::new(oracle),
        }
    }

    pub fn disjunct_parser(&self) -> &DisjunctParser {
        &self.disjuncts
    }

    pub fn signature(&self, raw: &[RawDisjunct]) -> Result<PatchSignature> {
        let parsed: Vec<DisjunctSignature> = raw
            .par_iter()
            .map(|disjunct| self.disjuncts.parse(disjunct))
            .collect::<Result<Vec<_>>>()?;
        let patch = PatchSignature::from_disjuncts(parsed, self.disjuncts.oracle())?;
        tracing::debug!(
            "Summary of {} disjuncts reduced to {} signatures",
            raw.len(),
            patch.len()
        );
        Ok(patch)
    }

    pub fn signature_from_str(&self, text: &str) -> Result<PatchSignature> {
        self.signature(&parse_summary_str(text)?)
    }

    pub fn signature_from_path(&self, path: impl AsRef<Path>) -> Result<PatchSignature> {
        self.signature(&read_summary(path)?)
    }

    pub fn traces(&self, raw: &[RawDisjunct]) -> Result<Vec<(DisjunctLabel, Vec<i64>)>> {
        raw.iter()
            .map(|disjunct| self.disjuncts.parse_trace(disjunct))
            .collect()
    }
}
