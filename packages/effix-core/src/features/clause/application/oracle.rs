//! Formula oracle
//!
//! The only three formula comparisons the rest of the crate performs:
//!
//! ```text
//! equivalent(f, g)       = UNSAT(¬(f ⟺ g))
//! implies(f, g)          = UNSAT(f ∧ ¬g)
//! strictly_smaller(f, g) = implies(f, g) ∧ ¬implies(g, f)
//! ```
//!
//! An `Unknown` verdict is read through the configured [`UnknownPolicy`].

use crate::config::{ConfigError, OracleBackend, OracleConfig, UnknownPolicy};
use crate::features::clause::domain::Formula;
use crate::features::clause::infrastructure::LightweightSolver;
use crate::features::clause::ports::{DecisionProcedure, EliminationError, OracleError, Verdict};
use std::fmt;
use std::sync::Arc;

#[derive(Clone)]
pub struct FormulaOracle {
    procedure: Arc<dyn DecisionProcedure>,
    unknown_policy: UnknownPolicy,
}

impl fmt::Debug for FormulaOracle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormulaOracle")
            .field("backend", &self.procedure.name())
            .field("unknown_policy", &self.unknown_policy)
            .finish()
    }
}

impl Default for FormulaOracle {
    fn default() -> Self {
        Self::new(Arc::new(LightweightSolver::new()), UnknownPolicy::NotEquivalent)
    }
}

impl FormulaOracle {
    pub fn new(procedure: Arc<dyn DecisionProcedure>, unknown_policy: UnknownPolicy) -> Self {
        Self {
            procedure,
            unknown_policy,
        }
    }

    /// Build the configured backend
    pub fn from_config(config: &OracleConfig) -> Result<Self, ConfigError> {
        let procedure: Arc<dyn DecisionProcedure> = match config.backend {
            OracleBackend::Lightweight => Arc::new(LightweightSolver::from_config(config)),
            #[cfg(feature = "z3")]
            OracleBackend::Z3 => Arc::new(
                crate::features::clause::infrastructure::Z3Solver::from_config(config),
            ),
            #[cfg(not(feature = "z3"))]
            OracleBackend::Z3 => return Err(ConfigError::BackendUnavailable("z3".to_string())),
        };
        tracing::debug!("Using {} decision procedure", procedure.name());
        Ok(Self::new(procedure, config.unknown_policy))
    }

    pub fn backend_name(&self) -> &'static str {
        self.procedure.name()
    }

    /// `true` iff `query` is proven unsatisfiable
    fn proven_unsat(&self, query: &Formula) -> Result<bool, OracleError> {
        match self.procedure.check_sat(query)? {
            Verdict::Unsat => Ok(true),
            Verdict::Sat => Ok(false),
            Verdict::Unknown => match self.unknown_policy {
                UnknownPolicy::NotEquivalent => {
                    tracing::debug!("{}: unknown verdict read as not proven", self.backend_name());
                    Ok(false)
                }
                UnknownPolicy::Error => Err(OracleError::Inconclusive {
                    backend: self.backend_name().to_string(),
                    query: query.to_string(),
                }),
            },
        }
    }

    pub fn equivalent(&self, f: &Formula, g: &Formula) -> Result<bool, OracleError> {
        if f == g {
            return Ok(true);
        }
        let query = Formula::Not(Box::new(Formula::Iff(
            Box::new(f.clone()),
            Box::new(g.clone()),
        )));
        self.proven_unsat(&query)
    }

    pub fn implies(&self, f: &Formula, g: &Formula) -> Result<bool, OracleError> {
        if f == g || g.is_true() {
            return Ok(true);
        }
        let query = Formula::and(vec![f.clone(), Formula::not(g.clone())]);
        self.proven_unsat(&query)
    }

    /// `f` implies `g` but not the other way round
    pub fn strictly_smaller(&self, f: &Formula, g: &Formula) -> Result<bool, OracleError> {
        Ok(self.implies(f, g)? && !self.implies(g, f)?)
    }

    pub fn eliminate(&self, vars: &[String], formula: &Formula) -> Result<Formula, EliminationError> {
        if vars.is_empty() {
            return Ok(formula.clone());
        }
        self.procedure.eliminate(vars, formula)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::clause::domain::Clause;

    fn atom(clause: Clause) -> Formula {
        Formula::atom(clause)
    }

    struct AlwaysUnknown;

    impl DecisionProcedure for AlwaysUnknown {
        fn name(&self) -> &'static str {
            "unknown"
        }

        fn check_sat(&self, _formula: &Formula) -> Result<Verdict, OracleError> {
            Ok(Verdict::Unknown)
        }

        fn eliminate(&self, _vars: &[String], formula: &Formula) -> Result<Formula, EliminationError> {
            Ok(formula.clone())
        }
    }

    #[test]
    fn test_equivalent_up_to_rewriting() {
        let oracle = FormulaOracle::default();
        let f = atom(Clause::less_than(Clause::int(0), Clause::symbol("x")));
        let g = atom(Clause::less_equal(Clause::int(1), Clause::symbol("x")));
        assert!(oracle.equivalent(&f, &g).unwrap());
    }

    #[test]
    fn test_implication_and_strictness() {
        let oracle = FormulaOracle::default();
        let narrow = atom(Clause::equal(Clause::symbol("x"), Clause::int(1)));
        let wide = atom(Clause::not_equal(Clause::symbol("x"), Clause::int(0)));
        assert!(oracle.implies(&narrow, &wide).unwrap());
        assert!(!oracle.implies(&wide, &narrow).unwrap());
        assert!(oracle.strictly_smaller(&narrow, &wide).unwrap());
        assert!(!oracle.strictly_smaller(&wide, &wide).unwrap());
    }

    #[test]
    fn test_anything_is_equivalent_check_against_true_terminates() {
        let oracle = FormulaOracle::default();
        let f = atom(Clause::not_equal(Clause::symbol("p"), Clause::int(0)));
        assert!(!oracle.equivalent(&f, &Formula::True).unwrap());
        assert!(oracle.equivalent(&Formula::True, &Formula::True).unwrap());
    }

    #[test]
    fn test_unknown_policy_not_equivalent() {
        let oracle = FormulaOracle::new(Arc::new(AlwaysUnknown), UnknownPolicy::NotEquivalent);
        let f = atom(Clause::equal(Clause::symbol("x"), Clause::int(1)));
        let g = atom(Clause::equal(Clause::symbol("y"), Clause::int(1)));
        assert!(!oracle.equivalent(&f, &g).unwrap());
    }

    #[test]
    fn test_unknown_policy_error() {
        let oracle = FormulaOracle::new(Arc::new(AlwaysUnknown), UnknownPolicy::Error);
        let f = atom(Clause::equal(Clause::symbol("x"), Clause::int(1)));
        let g = atom(Clause::equal(Clause::symbol("y"), Clause::int(1)));
        assert!(matches!(
            oracle.equivalent(&f, &g),
            Err(OracleError::Inconclusive { .. })
        ));
    }

    #[cfg(not(feature = "z3"))]
    #[test]
    fn test_z3_backend_unavailable() {
        let config = OracleConfig {
            backend: OracleBackend::Z3,
            ..OracleConfig::default()
        };
        assert!(matches!(
            FormulaOracle::from_config(&config),
            Err(ConfigError::BackendUnavailable(_))
        ));
    }
}
