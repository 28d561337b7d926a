//! Cluster manager
//!
//! Owns every cluster of one fix location. Adding a patch is a single
//! critical section on the cluster list: match against each existing
//! signature in creation order, else classify and append a new cluster.

use crate::config::ClusterConfig;
use crate::errors::Result;
use crate::features::clause::application::FormulaOracle;
use crate::features::cluster::domain::{Cluster, ClusterAssignment, PatchRecord};
use crate::features::equivalence::domain::PatchSignature;
use crate::features::reward::application::RewardClassifier;
use crate::features::reward::domain::BugDescriptor;
use parking_lot::Mutex;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug)]
pub struct ClusterManager {
    baseline: PatchSignature,
    bug: BugDescriptor,
    oracle: FormulaOracle,
    classifier: RewardClassifier,
    name_prefix: String,
    clusters: Mutex<Vec<Arc<Cluster>>>,
    non_compilable: Mutex<Vec<PathBuf>>,
}

impl ClusterManager {
    pub fn new(
        baseline: PatchSignature,
        bug: BugDescriptor,
        oracle: FormulaOracle,
        config: &ClusterConfig,
    ) -> Self {
        Self {
            baseline,
            bug,
            classifier: RewardClassifier::new(oracle.clone()),
            oracle,
            name_prefix: config.name_prefix.clone(),
            clusters: Mutex::new(Vec::new()),
            non_compilable: Mutex::new(Vec::new()),
        }
    }

    pub fn baseline(&self) -> &PatchSignature {
        &self.baseline
    }

    pub fn bug(&self) -> &BugDescriptor {
        &self.bug
    }

    /// File `patch` under the first cluster with an equal signature, or
    /// open a new cluster and grade it against the baseline
    pub fn add_patch(
        &self,
        path: impl Into<PathBuf>,
        size: usize,
        signature: PatchSignature,
    ) -> Result<ClusterAssignment> {
        let record = PatchRecord::new(path, size);
        let mut clusters = self.clusters.lock();

        let mut matched = None;
        for cluster in clusters.iter() {
            if cluster.signature().equal(&signature, &self.oracle)? {
                matched = Some(Arc::clone(cluster));
                break;
            }
        }

        let (cluster, created) = match matched {
            Some(cluster) => (cluster, false),
            None => {
                let name = format!("cluster-{}-{}", self.name_prefix, clusters.len());
                let verdict = self.classifier.classify(&self.baseline, &signature, &self.bug)?;
                tracing::info!("Created new cluster {}", name);
                tracing::debug!("Cluster signature: {}", signature);
                let cluster = Arc::new(Cluster::new(name, signature, verdict));
                clusters.push(Arc::clone(&cluster));
                (cluster, true)
            }
        };
        drop(clusters);

        tracing::debug!("Patch {} -> {}", record.path.display(), cluster.name());
        let record_path = record.path.clone();
        cluster.add_patch(record);
        if cluster.is_locally_good() {
            tracing::info!(
                "Found a locally good patch {} in {}",
                record_path.display(),
                cluster.name()
            );
        }

        Ok(ClusterAssignment {
            cluster: cluster.name().to_string(),
            created,
            verdict: cluster.verdict(),
        })
    }

    /// Record a patch whose analysis produced no summary
    pub fn add_non_compilable(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        tracing::debug!("Non-compilable patch {}", path.display());
        self.non_compilable.lock().push(path);
    }

    pub fn clusters(&self) -> Vec<Arc<Cluster>> {
        self.clusters.lock().clone()
    }

    pub fn non_compilable(&self) -> Vec<PathBuf> {
        self.non_compilable.lock().clone()
    }

    pub fn total_patches(&self) -> usize {
        let clustered: usize = self.clusters.lock().iter().map(|c| c.patch_count()).sum();
        clustered + self.non_compilable.lock().len()
    }

    /// Normal clusters, plus one for the non-compilable bucket when non-empty
    pub fn cluster_count(&self) -> usize {
        let normal = self.clusters.lock().len();
        if self.non_compilable.lock().is_empty() {
            normal
        } else {
            normal + 1
        }
    }

    /// 0.0 before any patch arrives
    pub fn average_patches_per_cluster(&self) -> f64 {
        let count = self.cluster_count();
        if count == 0 {
            return 0.0;
        }
        self.total_patches() as f64 / count as f64
    }

    pub fn locally_good_patches(&self) -> Vec<PatchRecord> {
        self.clusters
            .lock()
            .iter()
            .filter(|c| c.is_locally_good())
            .flat_map(|c| c.patches())
            .collect()
    }
}

impl fmt::Display for ClusterManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\nNormal clusters: [")?;
        for cluster in self.clusters.lock().iter() {
            write!(f, "{}", cluster)?;
        }
        writeln!(f, "]\n")?;
        writeln!(f, "Non-compilable cluster: [")?;
        for path in self.non_compilable.lock().iter() {
            writeln!(f, "\t{},", path.display())?;
        }
        writeln!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::clause::domain::Formula;
    use crate::features::disjunct::domain::DisjunctLabel;
    use crate::features::equivalence::domain::DisjunctSignature;
    use crate::features::heap_resolution::domain::{AliasGroup, AliasSets};
    use crate::features::reward::domain::{BugType, RewardLevel};

    fn p() -> AliasSets {
        [["p".to_string()].into_iter().collect::<AliasGroup>()]
            .into_iter()
            .collect()
    }

    fn single(text: &str, allocated: AliasSets, deallocated: AliasSets) -> PatchSignature {
        let sig = DisjunctSignature::new(
            DisjunctLabel::new(text, 10, 12),
            allocated,
            deallocated,
            Formula::True,
            Formula::True,
        );
        PatchSignature::from_disjuncts([sig], &FormulaOracle::default()).unwrap()
    }

    fn manager() -> ClusterManager {
        ClusterManager::new(
            single("ErrorMemoryLeak", p(), AliasSets::new()),
            BugDescriptor::new(BugType::MemoryLeak, "f", "a.c", 10, 12),
            FormulaOracle::default(),
            &ClusterConfig::default(),
        )
    }

    #[test]
    fn test_match_or_create() {
        let manager = manager();
        let first = manager
            .add_patch("a.diff", 2, single("Ok", AliasSets::new(), p()))
            .unwrap();
        assert!(first.created);
        assert_eq!(first.cluster, "cluster-fix-0");
        assert_eq!(first.verdict.pe, RewardLevel::Big);
        assert!(first.verdict.locally_good);

        let second = manager
            .add_patch("b.diff", 4, single("Ok", AliasSets::new(), p()))
            .unwrap();
        assert!(!second.created);
        assert_eq!(second.cluster, "cluster-fix-0");

        let third = manager
            .add_patch("c.diff", 1, single("ErrorMemoryLeak", p(), AliasSets::new()))
            .unwrap();
        assert_eq!(third.cluster, "cluster-fix-1");
        assert!(!third.verdict.locally_good);

        assert_eq!(manager.clusters().len(), 2);
        assert_eq!(manager.locally_good_patches().len(), 2);
    }

    #[test]
    fn test_totals_count_non_compilable_bucket() {
        let manager = manager();
        assert_eq!(manager.average_patches_per_cluster(), 0.0);
        manager
            .add_patch("a.diff", 2, single("Ok", AliasSets::new(), p()))
            .unwrap();
        manager.add_non_compilable("broken-1.diff");
        manager.add_non_compilable("broken-2.diff");
        assert_eq!(manager.total_patches(), 3);
        assert_eq!(manager.cluster_count(), 2);
        assert_eq!(manager.average_patches_per_cluster(), 1.5);

        let dump = manager.to_string();
        assert!(dump.contains("Normal clusters: ["));
        assert!(dump.contains("\tbroken-2.diff,"));
    }
}
