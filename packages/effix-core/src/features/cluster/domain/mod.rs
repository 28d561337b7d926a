//! Cluster domain models

use crate::features::equivalence::domain::PatchSignature;
use crate::features::reward::domain::RewardVerdict;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// One candidate patch file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchRecord {
    pub path: PathBuf,
    /// Size of the edit, as counted by the generator
    pub size: usize,
}

impl PatchRecord {
    pub fn new(path: impl Into<PathBuf>, size: usize) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }
}

/// Patches sharing one signature
///
/// The signature and verdict are fixed at creation; only the patch list
/// grows.
#[derive(Debug)]
pub struct Cluster {
    name: String,
    signature: PatchSignature,
    verdict: RewardVerdict,
    patches: Mutex<Vec<PatchRecord>>,
}

impl Cluster {
    pub fn new(name: impl Into<String>, signature: PatchSignature, verdict: RewardVerdict) -> Self {
        Self {
            name: name.into(),
            signature,
            verdict,
            patches: Mutex::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &PatchSignature {
        &self.signature
    }

    pub fn verdict(&self) -> RewardVerdict {
        self.verdict
    }

    pub fn is_locally_good(&self) -> bool {
        self.verdict.locally_good
    }

    pub fn add_patch(&self, patch: PatchRecord) {
        self.patches.lock().push(patch);
    }

    pub fn patches(&self) -> Vec<PatchRecord> {
        self.patches.lock().clone()
    }

    pub fn patch_count(&self) -> usize {
        self.patches.lock().len()
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} : {}, {} =>", self.name, self.verdict, self.signature)?;
        writeln!(f, "[")?;
        for patch in self.patches.lock().iter() {
            let prefix = if self.is_locally_good() { "Plausible Patch: " } else { "" };
            writeln!(f, "\t{}{} (size:{}),", prefix, patch.path.display(), patch.size)?;
        }
        writeln!(f, "]")
    }
}

/// Where a patch landed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterAssignment {
    pub cluster: String,
    /// The patch opened a new cluster
    pub created: bool,
    pub verdict: RewardVerdict,
}
