//! pe / ppie classification
//!
//! ```text
//! baseline, candidate
//!   1. strip disjuncts similar to the buggy one   (same text + start, other end)
//!   2. pe   : target gone? no new bug? old effects kept? no new effects?
//!   3. ppie : buggy disjunct entirely / partially changed? ok disjuncts intact?
//!   4. locally good = pe ≠ none ∧ ppie = big
//! ```
//!
//! A baseline without a disjunct showing the target bug is a caller error
//! ([`RewardError::BuggyDisjunctNotFound`]).

use crate::errors::Result;
use crate::features::clause::application::FormulaOracle;
use crate::features::equivalence::domain::{DisjunctSignature, PatchSignature};
use crate::features::reward::domain::{BugDescriptor, RewardError, RewardLevel, RewardVerdict};

/// Baseline and candidate disjuncts after similar-bug removal
#[derive(Debug, Clone)]
pub struct Comparison<'a> {
    pub baseline: Vec<&'a DisjunctSignature>,
    pub candidate: Vec<&'a DisjunctSignature>,
    /// Indices into `baseline` of the disjuncts showing the target bug
    pub buggy: Vec<usize>,
}

impl<'a> Comparison<'a> {
    /// The buggy disjunct used as reference when several show the bug
    pub fn buggy(&self) -> &'a DisjunctSignature {
        self.baseline[self.buggy[0]]
    }

    fn is_buggy(&self, index: usize) -> bool {
        self.buggy.contains(&index)
    }

    /// A candidate error-like disjunct with no (text, start) match among the
    /// baseline's error-like disjuncts
    pub fn introduces_new_bug(&self) -> bool {
        let original_errors: Vec<&DisjunctSignature> = self
            .baseline
            .iter()
            .copied()
            .filter(|sig| sig.label.is_error_like())
            .collect();
        self.candidate
            .iter()
            .filter(|sig| sig.label.is_error_like())
            .any(|sig| {
                !original_errors
                    .iter()
                    .any(|orig| sig.label.same_text_and_start(&orig.label))
            })
    }

    /// No candidate disjunct keeps the buggy (text, start) pair
    pub fn fixes_target(&self) -> bool {
        let buggy = self.buggy();
        !self
            .candidate
            .iter()
            .any(|sig| sig.label.same_text_and_start(&buggy.label))
    }
}

fn buggy_indices(disjuncts: &[&DisjunctSignature], bug: &BugDescriptor) -> std::result::Result<Vec<usize>, RewardError> {
    let indices: Vec<usize> = disjuncts
        .iter()
        .enumerate()
        .filter(|(_, sig)| bug.is_shown_by(&sig.label))
        .map(|(i, _)| i)
        .collect();
    if indices.is_empty() {
        return Err(RewardError::BuggyDisjunctNotFound {
            bug: bug.to_string(),
        });
    }
    Ok(indices)
}

/// Strip incidental bug instances that share the buggy disjunct's text and
/// start line but end elsewhere, from both sides
pub fn remove_similar_disjuncts<'a>(
    baseline: &'a PatchSignature,
    candidate: &'a PatchSignature,
    bug: &BugDescriptor,
) -> std::result::Result<Comparison<'a>, RewardError> {
    let all: Vec<&DisjunctSignature> = baseline.disjuncts().iter().collect();
    let buggy = all[buggy_indices(&all, bug)?[0]];

    let similar: Vec<&DisjunctSignature> = all
        .iter()
        .copied()
        .filter(|sig| sig.label.same_text_and_start(&buggy.label) && sig.label.end_line != buggy.label.end_line)
        .collect();
    if !similar.is_empty() {
        tracing::debug!("Ignoring {} disjuncts similar to {}", similar.len(), buggy.label);
    }
    let keep = |sig: &&DisjunctSignature| !similar.iter().any(|s| s.label == sig.label);

    let baseline: Vec<&DisjunctSignature> = all.iter().copied().filter(keep).collect();
    let candidate: Vec<&DisjunctSignature> = candidate.disjuncts().iter().filter(keep).collect();
    let buggy = buggy_indices(&baseline, bug)?;
    Ok(Comparison {
        baseline,
        candidate,
        buggy,
    })
}

#[derive(Debug, Clone, Default)]
pub struct RewardClassifier {
    oracle: FormulaOracle,
}

impl RewardClassifier {
    pub fn new(oracle: FormulaOracle) -> Self {
        Self { oracle }
    }

    pub fn classify(
        &self,
        baseline: &PatchSignature,
        candidate: &PatchSignature,
        bug: &BugDescriptor,
    ) -> Result<RewardVerdict> {
        let comparison = remove_similar_disjuncts(baseline, candidate, bug)?;
        let pe = self.elimination_progress(&comparison)?;
        let ppie = self.path_independent_improvement(&comparison)?;
        let verdict = RewardVerdict::new(pe, ppie);
        tracing::info!("pe_increment: {}, ppie_increment: {}", verdict.pe, verdict.ppie);
        Ok(verdict)
    }

    fn has_same_effect(
        &self,
        sig: &DisjunctSignature,
        pool: &[&DisjunctSignature],
    ) -> Result<bool> {
        for other in pool {
            if sig.same_effect(other, &self.oracle)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Elimination progress
    ///
    /// Effects are compared on (allocated, deallocated, return formula).
    /// The buggy disjuncts themselves need no counterpart, and a candidate
    /// disjunct spanning the buggy lines counts as their replacement.
    pub fn elimination_progress(&self, cmp: &Comparison<'_>) -> Result<RewardLevel> {
        if !cmp.fixes_target() {
            tracing::debug!("Target disjunct {} still present", cmp.buggy().label);
            return Ok(RewardLevel::None);
        }
        if cmp.introduces_new_bug() {
            tracing::debug!("Candidate introduces a new bug");
            return Ok(RewardLevel::None);
        }

        let non_abort: Vec<(usize, &DisjunctSignature)> = cmp
            .baseline
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, sig)| !sig.label.is_abort())
            .collect();

        for (index, orig) in &non_abort {
            if cmp.is_buggy(*index) {
                continue;
            }
            if !self.has_same_effect(orig, &cmp.candidate)? {
                tracing::debug!("Original effect of {} lost", orig.label);
                return Ok(RewardLevel::Small);
            }
        }

        if non_abort.len() != cmp.baseline.len() {
            return Ok(RewardLevel::Big);
        }

        let buggy = cmp.buggy();
        let originals: Vec<&DisjunctSignature> = non_abort.iter().map(|(_, sig)| *sig).collect();
        for sig in &cmp.candidate {
            let replaces_buggy =
                sig.label.start_line == buggy.label.start_line && sig.label.end_line == buggy.label.end_line;
            if replaces_buggy {
                continue;
            }
            if !self.has_same_effect(sig, &originals)? {
                tracing::debug!("New effect introduced by {}", sig.label);
                return Ok(RewardLevel::Small);
            }
        }
        Ok(RewardLevel::Big)
    }

    /// Path-independent improvement
    ///
    /// Matching is on (label text, start line, allocated, deallocated).
    pub fn path_independent_improvement(&self, cmp: &Comparison<'_>) -> Result<RewardLevel> {
        if cmp.introduces_new_bug() {
            return Ok(RewardLevel::None);
        }

        let buggy = cmp.buggy();
        let mut entirely_changed = true;
        let mut partially_changed = false;
        for sig in &cmp.candidate {
            if !sig.same_origin_and_sets(buggy) {
                continue;
            }
            entirely_changed = false;
            if self.oracle.strictly_smaller(&sig.formula, &buggy.formula)? {
                partially_changed = true;
                break;
            }
        }

        if self.ok_disjunct_changed(cmp)? {
            return Ok(RewardLevel::None);
        }
        Ok(if entirely_changed {
            RewardLevel::Big
        } else if partially_changed {
            RewardLevel::Small
        } else {
            RewardLevel::None
        })
    }

    fn ok_disjunct_changed(&self, cmp: &Comparison<'_>) -> Result<bool> {
        for (index, orig) in cmp.baseline.iter().enumerate() {
            if cmp.is_buggy(index) {
                continue;
            }
            let matches: Vec<&&DisjunctSignature> = cmp
                .candidate
                .iter()
                .filter(|sig| orig.same_origin_and_sets(sig))
                .collect();
            let mut preserved = false;
            for sig in matches {
                if self.oracle.equivalent(&sig.formula, &orig.formula)? {
                    preserved = true;
                    break;
                }
            }
            if !preserved {
                tracing::debug!("Original disjunct {} changed", orig.label);
                return Ok(true);
            }
        }
        Ok(false)
    }
}
