use nalgebra::Vector3;
use serde::Deserialize;

/// A perturbable scalar with end-state-A and end-state-B values.
///
/// Free-energy perturbation interpolates every parameter linearly between two
/// end-states; kinds that are not perturbed store equal ends.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct AB {
    pub a: f64,
    pub b: f64,
}

impl AB {
    pub const fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }

    /// An unperturbed value: both end-states equal.
    pub const fn fixed(value: f64) -> Self {
        Self { a: value, b: value }
    }

    /// Linear blend `(1-λ)·a + λ·b`.
    #[inline]
    pub fn at(&self, lambda: f64) -> f64 {
        (1.0 - lambda) * self.a + lambda * self.b
    }

    /// End-state difference `b - a`.
    #[inline]
    pub fn delta(&self) -> f64 {
        self.b - self.a
    }

    /// Both end-states multiplied by `factor`. Used to convert references
    /// stored in degrees into radians before blending.
    #[inline]
    pub fn scaled(&self, factor: f64) -> AB {
        AB {
            a: self.a * factor,
            b: self.b * factor,
        }
    }
}

/// Harmonic spring about a reference value of some coordinate.
///
/// Shared by harmonic bonds (x = distance), harmonic angles and improper
/// dihedrals (x = angle, reference stored in degrees), G96 bonds (x = squared
/// distance), and G96 angles (x = cos θ).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct HarmonicParams {
    /// Spring constant.
    pub k: AB,
    /// Reference value of the kernel-specific coordinate.
    pub x0: AB,
}

/// Morse bond: `V = depth·(1 - e^{-beta·(r - b0)})²`.
///
/// Referenced to zero at the equilibrium distance and `+depth` at infinite
/// separation.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct MorseParams {
    /// Equilibrium distance.
    pub b0: AB,
    /// Steepness (inverse length).
    pub beta: AB,
    /// Well depth.
    pub depth: AB,
}

/// Proper periodic dihedral: `V = barrier·(1 + cos(mult·φ - φ0))`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PeriodicDihedralParams {
    /// Barrier height.
    pub barrier: AB,
    /// Phase, in degrees.
    pub phase_deg: AB,
    /// Multiplicity; validated to be >= 1 at topology load.
    pub multiplicity: i32,
}

/// Ryckaert-Bellemans dihedral: six-term polynomial in cos ψ, where ψ is the
/// dihedral angle in the polymer convention (ψ = φ - π).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RbParams {
    pub c: [AB; 6],
}

/// Position restraint: independent per-axis springs toward a fixed point.
/// Not λ-perturbed.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PositionRestraintParams {
    /// Per-axis force constants.
    pub fc: Vector3<f64>,
    /// Reference position.
    pub reference: Vector3<f64>,
}

/// Lennard-Jones parameters for one excluded 1-4 pair, in c6/c12 form:
/// `V = c12/r¹² - c6/r⁶`. Charges come from the per-atom tables.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Pair14Params {
    pub c6: AB,
    pub c12: AB,
}

/// Anisotropic water polarization: a shell bound to a dummy through springs
/// that differ along the three axes of the molecular frame. Not λ-perturbed.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct WaterPolParams {
    /// Spring constant along the frame normal.
    pub kx: f64,
    /// Spring constant along the in-plane H-H direction.
    pub ky: f64,
    /// Spring constant along the O-dummy direction.
    pub kz: f64,
    /// Reference H1-H2 distance used to scale the in-plane axis.
    pub r_hh: f64,
    /// Reference O-dummy distance.
    pub r_od: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;

    #[test]
    fn ab_at_zero_returns_a_state() {
        let p = AB::new(3.0, 7.0);
        assert!((p.at(0.0) - 3.0).abs() < TOLERANCE);
    }

    #[test]
    fn ab_at_one_returns_b_state() {
        let p = AB::new(3.0, 7.0);
        assert!((p.at(1.0) - 7.0).abs() < TOLERANCE);
    }

    #[test]
    fn ab_at_half_is_midpoint() {
        let p = AB::new(2.0, 4.0);
        assert!((p.at(0.5) - 3.0).abs() < TOLERANCE);
    }

    #[test]
    fn ab_fixed_has_zero_delta() {
        let p = AB::fixed(5.0);
        assert_eq!(p.delta(), 0.0);
        assert_eq!(p.at(0.3), 5.0);
    }
}
