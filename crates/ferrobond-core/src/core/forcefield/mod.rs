//! # Force Field Module
//!
//! The pure mathematics of bonded interactions: periodic-image geometry,
//! free-energy interpolation, momentum-conserving force/virial distribution,
//! and one evaluation kernel per interaction kind.
//!
//! ## Key Components
//!
//! - [`geometry`] - Minimum-image displacements, bond angles, and dihedral
//!   angles under an explicit periodicity configuration.
//! - [`blend`] - The two-end-state harmonic interpolator shared by every
//!   λ-aware harmonic-family kernel, with exact closed-form dV/dλ.
//! - [`distribute`] - Spreads scalar force magnitudes over the 2-5 atoms of
//!   one instance and mirrors the contributions into the shift-force table.
//! - [`kernels`] - Per-kind evaluation routines built on the three components
//!   above.
//! - [`term`] - Per-kind energy accumulators, energy-group tallies, and
//!   kernel performance counters.
//!
//! Every function here is a pure function of its inputs; mutable outputs are
//! passed in explicitly by the [`crate::engine`] layer.

pub mod blend;
pub mod distribute;
pub mod geometry;
pub mod kernels;
pub mod term;

use serde::Deserialize;

/// Empirical numerical guards for the angle and dihedral kernels.
///
/// The defaults match the constants classical simulation codes use; callers
/// may tighten or loosen them.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct NumericalPolicy {
    /// Floor applied to |sin θ| in the angle force projection, preventing
    /// division blow-up for nearly linear angles.
    pub sine_floor: f64,
    /// Absolute bound on every Ryckaert-Bellemans intermediate; exceeding it
    /// (or going NaN) is a fatal numerical divergence.
    pub rb_bound: f64,
}

impl Default for NumericalPolicy {
    fn default() -> Self {
        Self {
            sine_floor: 1e-12,
            rb_bound: 1e10,
        }
    }
}
