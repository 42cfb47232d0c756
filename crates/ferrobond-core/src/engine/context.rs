use crate::core::forcefield::NumericalPolicy;
use crate::core::forcefield::geometry::Pbc;
use serde::Deserialize;

/// Electrostatic conversion factor 1/(4πε₀) in kJ·mol⁻¹·nm·e⁻².
pub const ELECTRIC_CONVERSION_FACTOR: f64 = 138.935485;

/// Settings for the 1-4 pair kernel.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PairConfig {
    /// Electrostatic conversion factor, possibly pre-scaled by a reaction
    /// field correction.
    pub epsilon_factor: f64,
    /// 1-4 Coulomb scaling (fudge) factor.
    pub fudge_qq: f64,
    /// Long-range cutoff; a 1-4 pair separated further than this is reported
    /// as a topology/cutoff mismatch. `None` disables the check.
    pub cutoff: Option<f64>,
}

impl Default for PairConfig {
    fn default() -> Self {
        Self {
            epsilon_factor: ELECTRIC_CONVERSION_FACTOR,
            fudge_qq: 1.0,
            cutoff: None,
        }
    }
}

/// Everything one evaluation pass needs to know beyond the topology itself.
///
/// The periodicity mode is fixed when the [`Pbc`] resolver is constructed and
/// is read-only for the whole pass; no kernel re-resolves it mid-evaluation.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext {
    pub pbc: Pbc,
    /// Free-energy coupling in [0, 1].
    pub lambda: f64,
    pub policy: NumericalPolicy,
    pub pair: PairConfig,
}

impl EvaluationContext {
    pub fn new(pbc: Pbc, lambda: f64) -> Self {
        Self {
            pbc,
            lambda,
            policy: NumericalPolicy::default(),
            pair: PairConfig::default(),
        }
    }

    pub fn with_policy(mut self, policy: NumericalPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_pair_config(mut self, pair: PairConfig) -> Self {
        self.pair = pair;
        self
    }
}
