//! Disjunct and patch signatures
//!
//! Equality needs oracle calls, so signatures are never hashed. Every
//! comparison is two-tier: the syntactic part (label, allocated and
//! deallocated alias sets) rejects cheaply, formulas go to the oracle only
//! when that part agrees.

use crate::features::clause::application::FormulaOracle;
use crate::features::clause::domain::Formula;
use crate::features::clause::ports::OracleError;
use crate::features::disjunct::domain::DisjunctLabel;
use crate::features::heap_resolution::domain::AliasSets;
use std::collections::HashMap;
use std::fmt;

/// Semantic summary of one symbolic branch
#[derive(Debug, Clone, PartialEq)]
pub struct DisjunctSignature {
    pub label: DisjunctLabel,
    pub allocated: AliasSets,
    pub deallocated: AliasSets,
    /// Constraints on the call's result
    pub ret: Formula,
    /// Everything else
    pub formula: Formula,
}

/// Syntactic part of a signature, compared before any oracle call
pub type CheapKey<'a> = (&'a DisjunctLabel, &'a AliasSets, &'a AliasSets);

impl DisjunctSignature {
    pub fn new(
        label: DisjunctLabel,
        allocated: AliasSets,
        deallocated: AliasSets,
        ret: Formula,
        formula: Formula,
    ) -> Self {
        Self {
            label,
            allocated,
            deallocated,
            ret,
            formula,
        }
    }

    /// Empty sets and `True` formulas
    pub fn trivial(label: DisjunctLabel) -> Self {
        Self::new(
            label,
            AliasSets::new(),
            AliasSets::new(),
            Formula::True,
            Formula::True,
        )
    }

    pub fn cheap_key(&self) -> CheapKey<'_> {
        (&self.label, &self.allocated, &self.deallocated)
    }

    pub fn same_sets(&self, other: &DisjunctSignature) -> bool {
        self.allocated == other.allocated && self.deallocated == other.deallocated
    }

    /// Same label text, start line and alias sets
    pub fn same_origin_and_sets(&self, other: &DisjunctSignature) -> bool {
        self.label.same_text_and_start(&other.label) && self.same_sets(other)
    }

    /// Same observable effect: alias sets and equivalent return constraints
    pub fn same_effect(&self, other: &DisjunctSignature, oracle: &FormulaOracle) -> Result<bool, OracleError> {
        if !self.same_sets(other) {
            return Ok(false);
        }
        oracle.equivalent(&self.ret, &other.ret)
    }

    /// Whether `self` and `other` may collapse into one signature
    ///
    /// Merge-eligible error labels ignore the general formula; every other
    /// label needs it equivalent too.
    pub fn mergeable(&self, other: &DisjunctSignature, oracle: &FormulaOracle) -> Result<bool, OracleError> {
        if self.label != other.label || !self.same_effect(other, oracle)? {
            return Ok(false);
        }
        if self.label.is_merge_eligible() {
            return Ok(true);
        }
        oracle.equivalent(&self.formula, &other.formula)
    }

    /// Disjoin the general formulas; callers check [`Self::mergeable`] first
    pub fn merge(&self, other: &DisjunctSignature) -> DisjunctSignature {
        DisjunctSignature {
            label: self.label.clone(),
            allocated: self.allocated.clone(),
            deallocated: self.deallocated.clone(),
            ret: self.ret.clone(),
            formula: Formula::or(vec![self.formula.clone(), other.formula.clone()]),
        }
    }

    /// Full equality: syntactic part, return and general formulas
    pub fn equal(&self, other: &DisjunctSignature, oracle: &FormulaOracle) -> Result<bool, OracleError> {
        if self.cheap_key() != other.cheap_key() {
            return Ok(false);
        }
        Ok(oracle.equivalent(&self.ret, &other.ret)? && oracle.equivalent(&self.formula, &other.formula)?)
    }
}

fn fmt_alias_sets(f: &mut fmt::Formatter<'_>, sets: &AliasSets) -> fmt::Result {
    write!(f, "{{")?;
    for (i, group) in sets.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        let members: Vec<&str> = group.iter().map(String::as_str).collect();
        write!(f, "{{{}}}", members.join(", "))?;
    }
    write!(f, "}}")
}

impl fmt::Display for DisjunctSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DisjunctSignature: label: {}, allocated: ", self.label)?;
        fmt_alias_sets(f, &self.allocated)?;
        write!(f, ", deallocated: ")?;
        fmt_alias_sets(f, &self.deallocated)?;
        write!(f, ", return: {}, formula: {}", self.ret, self.formula)
    }
}

/// Reduced set of disjunct signatures for one patch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatchSignature {
    disjuncts: Vec<DisjunctSignature>,
}

impl PatchSignature {
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorb every signature in order
    pub fn from_disjuncts(
        disjuncts: impl IntoIterator<Item = DisjunctSignature>,
        oracle: &FormulaOracle,
    ) -> Result<Self, OracleError> {
        let mut patch = Self::new();
        for disjunct in disjuncts {
            patch.absorb(disjunct, oracle)?;
        }
        Ok(patch)
    }

    pub fn disjuncts(&self) -> &[DisjunctSignature] {
        &self.disjuncts
    }

    pub fn len(&self) -> usize {
        self.disjuncts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.disjuncts.is_empty()
    }

    /// Merge `disjunct` into the first mergeable member, else append it
    pub fn absorb(&mut self, disjunct: DisjunctSignature, oracle: &FormulaOracle) -> Result<(), OracleError> {
        for existing in self.disjuncts.iter_mut() {
            if disjunct.mergeable(existing, oracle)? {
                tracing::trace!("Merging {} into existing disjunct", disjunct.label);
                *existing = disjunct.merge(existing);
                return Ok(());
            }
        }
        self.disjuncts.push(disjunct);
        Ok(())
    }

    /// Perfect matching between the two disjunct multisets under full equality
    pub fn equal(&self, other: &PatchSignature, oracle: &FormulaOracle) -> Result<bool, OracleError> {
        if self.len() != other.len() {
            return Ok(false);
        }

        let mut mine: Vec<CheapKey<'_>> = self.disjuncts.iter().map(DisjunctSignature::cheap_key).collect();
        let mut theirs: Vec<CheapKey<'_>> = other.disjuncts.iter().map(DisjunctSignature::cheap_key).collect();
        mine.sort();
        theirs.sort();
        if mine != theirs {
            return Ok(false);
        }

        let mut matching = Matching::new(&self.disjuncts, &other.disjuncts, oracle);
        for left in 0..self.len() {
            let mut visited = vec![false; other.len()];
            if !matching.augment(left, &mut visited)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Kuhn's augmenting-path matching with lazily evaluated, cached edges
struct Matching<'a> {
    left: &'a [DisjunctSignature],
    right: &'a [DisjunctSignature],
    oracle: &'a FormulaOracle,
    edges: HashMap<(usize, usize), bool>,
    owner: Vec<Option<usize>>,
}

impl<'a> Matching<'a> {
    fn new(left: &'a [DisjunctSignature], right: &'a [DisjunctSignature], oracle: &'a FormulaOracle) -> Self {
        Self {
            left,
            right,
            oracle,
            edges: HashMap::new(),
            owner: vec![None; right.len()],
        }
    }

    fn edge(&mut self, i: usize, j: usize) -> Result<bool, OracleError> {
        if let Some(&known) = self.edges.get(&(i, j)) {
            return Ok(known);
        }
        let equal = self.left[i].equal(&self.right[j], self.oracle)?;
        self.edges.insert((i, j), equal);
        Ok(equal)
    }

    fn augment(&mut self, i: usize, visited: &mut [bool]) -> Result<bool, OracleError> {
        for j in 0..self.right.len() {
            if visited[j] || !self.edge(i, j)? {
                continue;
            }
            visited[j] = true;
            let free = match self.owner[j] {
                None => true,
                Some(k) => self.augment(k, visited)?,
            };
            if free {
                self.owner[j] = Some(i);
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl fmt::Display for PatchSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sorted: Vec<&DisjunctSignature> = self.disjuncts.iter().collect();
        sorted.sort_by(|a, b| a.label.cmp(&b.label));
        writeln!(f, "PatchSignature: [")?;
        for disjunct in sorted {
            writeln!(f, "\t{},", disjunct)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::clause::domain::Clause;
    use crate::features::heap_resolution::domain::AliasGroup;

    fn sets(groups: &[&[&str]]) -> AliasSets {
        groups
            .iter()
            .map(|g| g.iter().map(|s| s.to_string()).collect::<AliasGroup>())
            .collect()
    }

    fn cmp(kind: fn(Clause, Clause) -> Clause, name: &str, value: i64) -> Formula {
        Formula::atom(kind(Clause::symbol(name), Clause::int(value)))
    }

    fn sig(text: &str, formula: Formula) -> DisjunctSignature {
        DisjunctSignature::new(
            DisjunctLabel::new(text, 10, 12),
            sets(&[&["p"]]),
            AliasSets::new(),
            Formula::True,
            formula,
        )
    }

    #[test]
    fn test_error_labels_merge_regardless_of_formula() {
        let oracle = FormulaOracle::default();
        let a = sig("ErrorMemoryLeak", cmp(Clause::equal, "x", 0));
        let b = sig("ErrorMemoryLeak", cmp(Clause::equal, "x", 1));
        assert!(a.mergeable(&b, &oracle).unwrap());
        let merged = a.merge(&b);
        assert!(oracle
            .equivalent(
                &merged.formula,
                &Formula::or(vec![cmp(Clause::equal, "x", 0), cmp(Clause::equal, "x", 1)])
            )
            .unwrap());
    }

    #[test]
    fn test_ok_labels_need_equivalent_formula() {
        let oracle = FormulaOracle::default();
        let a = sig("Ok", cmp(Clause::less_than, "x", 1));
        let b = sig("Ok", cmp(Clause::less_equal, "x", 0));
        let c = sig("Ok", cmp(Clause::less_equal, "x", 1));
        assert!(a.mergeable(&b, &oracle).unwrap());
        assert!(!a.mergeable(&c, &oracle).unwrap());
    }

    #[test]
    fn test_different_sets_never_merge() {
        let oracle = FormulaOracle::default();
        let a = sig("ErrorMemoryLeak", Formula::True);
        let mut b = a.clone();
        b.allocated = sets(&[&["p", "q"]]);
        assert!(!a.mergeable(&b, &oracle).unwrap());
        assert!(!a.equal(&b, &oracle).unwrap());
    }

    #[test]
    fn test_absorb_merges_into_first_match() {
        let oracle = FormulaOracle::default();
        let patch = PatchSignature::from_disjuncts(
            vec![
                sig("ErrorMemoryLeak", cmp(Clause::equal, "x", 0)),
                sig("Ok", cmp(Clause::equal, "x", 5)),
                sig("ErrorMemoryLeak", cmp(Clause::equal, "x", 1)),
                sig("Ok", cmp(Clause::equal, "x", 6)),
            ],
            &oracle,
        )
        .unwrap();
        assert_eq!(patch.len(), 3);
        assert_eq!(patch.disjuncts()[0].label.text, "ErrorMemoryLeak");
    }

    #[test]
    fn test_patch_equality_is_order_insensitive() {
        let oracle = FormulaOracle::default();
        let a = sig("Ok", cmp(Clause::less_than, "x", 1));
        let b = sig("Ok", cmp(Clause::less_equal, "x", 7));
        let mut left = PatchSignature::new();
        left.disjuncts = vec![a.clone(), b.clone()];
        let mut right = PatchSignature::new();
        right.disjuncts = vec![b.clone(), sig("Ok", cmp(Clause::less_equal, "x", 0))];
        assert!(left.equal(&right, &oracle).unwrap());

        right.disjuncts = vec![b.clone(), b];
        assert!(!left.equal(&right, &oracle).unwrap());
    }

    #[test]
    fn test_matching_across_reversed_order() {
        let oracle = FormulaOracle::default();
        let wide = sig("Ok", Formula::True);
        let narrow = sig("Ok", cmp(Clause::equal, "x", 3));
        let mut left = PatchSignature::new();
        left.disjuncts = vec![wide.clone(), narrow.clone()];
        let mut right = PatchSignature::new();
        right.disjuncts = vec![narrow, wide];
        assert!(left.equal(&right, &oracle).unwrap());
    }

    #[test]
    fn test_display_sorted_by_label() {
        let mut patch = PatchSignature::new();
        patch.disjuncts = vec![sig("Ok", Formula::True), sig("ErrorMemoryLeak", Formula::True)];
        let text = patch.to_string();
        let leak = text.find("ErrorMemoryLeak").unwrap();
        let ok = text.find("<Ok").unwrap();
        assert!(leak < ok);
        assert!(text.contains("allocated: {{p}}"));
    }
}
