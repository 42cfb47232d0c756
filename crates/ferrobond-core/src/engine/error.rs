use crate::core::forcefield::kernels::dihedrals::NumericalDivergence;
use crate::core::model::kind::InteractionKind;
use crate::core::model::topology::TopologyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvaluateError {
    /// A Ryckaert-Bellemans intermediate went NaN or out of range. The caller
    /// decides whether this ends the process; it must not be swallowed, since
    /// the force buffers may hold partial contributions.
    #[error(transparent)]
    NumericalDivergence(#[from] NumericalDivergence),

    /// The topology carries instances of a kind this build has no kernel
    /// for. Silently returning zero would corrupt the simulation, so the
    /// evaluation fails instead.
    #[error("no kernel registered for interaction kind {0:?}")]
    Unimplemented(InteractionKind),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error("{what}: expected {expected} entries, found {actual}")]
    SizeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}
