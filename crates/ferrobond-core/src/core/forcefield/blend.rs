use crate::core::model::params::AB;

/// The result of evaluating a λ-blended harmonic law at one coordinate value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blended {
    /// Potential `½·k·(x - x0)²`.
    pub energy: f64,
    /// Restoring force `-k·(x - x0)` along the coordinate.
    pub force: f64,
    /// Exact analytic `∂V/∂λ`.
    pub dvdl: f64,
}

/// Evaluates a harmonic potential whose stiffness and reference value are
/// linearly interpolated between two end-states.
///
/// With `L1 = 1-λ`, `k = L1·kA + λ·kB`, `x0 = L1·x0A + λ·x0B`, and
/// `d = x - x0`:
///
/// ```text
/// V      = ½·k·d²
/// F      = -k·d
/// dV/dλ  = ½·(kB - kA)·d² + (x0A - x0B)·k·d
/// ```
///
/// This single closed form carries the free-energy coupling for harmonic
/// bonds (x = r), angles and improper dihedrals (x = angle in radians), G96
/// bonds (x = r²), and G96 angles (x = cos θ); only the choice of coordinate
/// differs per kernel.
#[inline]
pub fn harmonic_blend(k: AB, x0: AB, x: f64, lambda: f64) -> Blended {
    let kk = k.at(lambda);
    let dx = x - x0.at(lambda);
    let dx2 = dx * dx;

    Blended {
        energy: 0.5 * kk * dx2,
        force: -kk * dx,
        dvdl: 0.5 * k.delta() * dx2 - x0.delta() * kk * dx,
    }
}
