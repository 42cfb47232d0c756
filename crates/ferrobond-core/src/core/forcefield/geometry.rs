use nalgebra::{Matrix3, Vector3};
use serde::Deserialize;

/// Whether displacements are corrected for periodic images.
///
/// Resolved once per evaluation session when the [`Pbc`] resolver is built,
/// never re-queried mid-pass, so every kernel sees consistent geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum PbcMode {
    None,
    Full,
}

/// Periodic-image-aware displacement resolver.
///
/// Holds the triclinic box as a lower-triangular matrix of row vectors. With
/// [`PbcMode::None`] the box is ignored and displacements are plain
/// differences.
#[derive(Debug, Clone, Copy)]
pub struct Pbc {
    cell: Option<Matrix3<f64>>,
}

impl Pbc {
    pub fn new(mode: PbcMode, cell: Matrix3<f64>) -> Self {
        Self {
            cell: match mode {
                PbcMode::Full => Some(cell),
                PbcMode::None => None,
            },
        }
    }

    /// A resolver for a non-periodic system.
    pub fn none() -> Self {
        Self { cell: None }
    }

    pub fn is_periodic(&self) -> bool {
        self.cell.is_some()
    }

    /// `xi - xj`, wrapped to the nearest periodic image when periodicity is
    /// enabled. Triclinic rows are applied z, y, x so that earlier shifts can
    /// carry into the remaining dimensions.
    #[inline]
    pub fn delta(&self, xi: &Vector3<f64>, xj: &Vector3<f64>) -> Vector3<f64> {
        let mut dx = xi - xj;
        if let Some(cell) = &self.cell {
            for d in (0..3).rev() {
                let row = Vector3::new(cell[(d, 0)], cell[(d, 1)], cell[(d, 2)]);
                let half = 0.5 * cell[(d, d)];
                while dx[d] > half {
                    dx -= row;
                }
                while dx[d] < -half {
                    dx += row;
                }
            }
        }
        dx
    }
}

/// Cosine of the angle between two vectors, clamped to [-1, 1] so that the
/// downstream `acos` stays defined under floating-point round-off.
#[inline]
pub fn cos_angle(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    let norms = (a.norm_squared() * b.norm_squared()).sqrt();
    if norms == 0.0 {
        return 1.0;
    }
    (a.dot(b) / norms).clamp(-1.0, 1.0)
}

/// The angle at vertex `xj` between bonds `xi-xj` and `xk-xj`, plus the raw
/// (non-unit) edge vectors the force distributor needs.
pub fn bond_angle(
    pbc: &Pbc,
    xi: &Vector3<f64>,
    xj: &Vector3<f64>,
    xk: &Vector3<f64>,
) -> (f64, f64, Vector3<f64>, Vector3<f64>) {
    let r_ij = pbc.delta(xi, xj);
    let r_kj = pbc.delta(xk, xj);
    let cos_theta = cos_angle(&r_ij, &r_kj);
    (cos_theta.acos(), cos_theta, r_ij, r_kj)
}

/// Everything the dihedral kernels need from one four-atom geometry: the
/// signed angle, its cosine, the edge vectors, and the two plane normals.
#[derive(Debug, Clone, Copy)]
pub struct DihedralGeometry {
    pub phi: f64,
    pub cos_phi: f64,
    pub sign: f64,
    pub r_ij: Vector3<f64>,
    pub r_kj: Vector3<f64>,
    pub r_kl: Vector3<f64>,
    pub m: Vector3<f64>,
    pub n: Vector3<f64>,
}

/// The dihedral angle φ ∈ (-π, π] around the `xj`-`xk` axis.
///
/// φ is the angle between the plane normals `m = r_ij × r_kj` and
/// `n = r_kj × r_kl`, with its sign resolved from the scalar triple product
/// `r_ij · n`.
pub fn dihedral_angle(
    pbc: &Pbc,
    xi: &Vector3<f64>,
    xj: &Vector3<f64>,
    xk: &Vector3<f64>,
    xl: &Vector3<f64>,
) -> DihedralGeometry {
    let r_ij = pbc.delta(xi, xj);
    let r_kj = pbc.delta(xk, xj);
    let r_kl = pbc.delta(xk, xl);

    let m = r_ij.cross(&r_kj);
    let n = r_kj.cross(&r_kl);
    let cos_phi = cos_angle(&m, &n);
    let sign = if r_ij.dot(&n) < 0.0 { -1.0 } else { 1.0 };
    let phi = sign * cos_phi.acos();

    DihedralGeometry {
        phi,
        cos_phi,
        sign,
        r_ij,
        r_kj,
        r_kl,
        m,
        n,
    }
}
