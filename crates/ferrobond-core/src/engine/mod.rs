//! # Engine Module
//!
//! Orchestrates one force evaluation over a validated bonded topology.
//!
//! - [`context`] - The per-evaluation configuration: periodicity resolver,
//!   the free-energy coupling λ, numerical policy, and 1-4 pair settings.
//! - [`buffers`] - The caller-owned output accumulators: force array,
//!   shift-force table, per-kind energies, dV/dλ, energy-group tallies, and
//!   kernel counters.
//! - [`dispatch`] - The driver that visits every interaction kind in a fixed
//!   deterministic order and invokes exactly one kernel per non-empty table.
//! - [`error`] - The evaluation failure type. Failures here are never
//!   transient: they mean invalid topology or a diverged trajectory, and
//!   nothing in this core retries.

pub mod buffers;
pub mod context;
pub mod dispatch;
pub mod error;

pub use buffers::Accumulators;
pub use context::{EvaluationContext, PairConfig};
pub use dispatch::evaluate;
pub use error::EvaluateError;

#[cfg(feature = "parallel")]
pub use dispatch::evaluate_parallel;
