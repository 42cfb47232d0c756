use super::geometry::DihedralGeometry;
use nalgebra::Vector3;

/// Mutable force outputs of one evaluation pass: the per-atom force array,
/// the shift-indexed virial table, and the externally supplied per-atom shift
/// indices.
///
/// Every spread routine adds contributions that sum to the zero vector over
/// the instance's atoms, and mirrors each atom contribution, identically
/// signed, into the shift-force table. Summing the shift table together with
/// the local forces therefore reproduces the system virial under periodic
/// boundaries.
pub struct ForceSink<'a> {
    pub forces: &'a mut [Vector3<f64>],
    pub shift_forces: &'a mut [Vector3<f64>],
    pub shift_index: &'a [usize],
}

impl ForceSink<'_> {
    #[inline]
    fn shift_of(&self, atom: usize) -> usize {
        self.shift_index[atom]
    }

    /// Adds a force on one atom without a virial contribution. Used by the
    /// position-restraint and polarization kernels, whose reference geometry
    /// does not enter the shift table.
    #[inline]
    pub fn add_unshifted(&mut self, atom: usize, f: Vector3<f64>) {
        self.forces[atom] += f;
    }

    /// Spreads a scalar bond force along `dx` over atoms `ai` (+) and `aj`
    /// (-), mirroring both into the shift table.
    #[inline]
    pub fn spread_pair(&mut self, f_scalar: f64, dx: &Vector3<f64>, ai: usize, aj: usize) {
        let fij = f_scalar * dx;
        self.forces[ai] += fij;
        self.forces[aj] -= fij;
        self.shift_forces[self.shift_of(ai)] += fij;
        self.shift_forces[self.shift_of(aj)] -= fij;
    }

    /// Spreads an angle force `f_theta = -dV/dθ` over the three atoms via
    /// projections onto the two edge vectors.
    ///
    /// `|sin θ|` is floored at `sine_floor` so that nearly linear angles
    /// produce large-but-finite forces instead of dividing by zero.
    pub fn spread_angle(
        &mut self,
        f_theta: f64,
        theta: f64,
        cos_theta: f64,
        r_ij: &Vector3<f64>,
        r_kj: &Vector3<f64>,
        ai: usize,
        aj: usize,
        ak: usize,
        sine_floor: f64,
    ) {
        let mut snt = theta.sin();
        if snt.abs() < sine_floor {
            snt = sine_floor;
        }
        let st = f_theta / snt;
        let sth = st * cos_theta;

        let nrij2 = r_ij.norm_squared();
        let nrkj2 = r_kj.norm_squared();

        let cik = st / (nrij2 * nrkj2).sqrt();
        let cii = sth / nrij2;
        let ckk = sth / nrkj2;

        let f_i = -(cik * r_kj - cii * r_ij);
        let f_k = -(cik * r_ij - ckk * r_kj);
        let f_j = -f_i - f_k;

        self.forces[ai] += f_i;
        self.forces[aj] += f_j;
        self.forces[ak] += f_k;
        self.shift_forces[self.shift_of(ai)] += f_i;
        self.shift_forces[self.shift_of(aj)] += f_j;
        self.shift_forces[self.shift_of(ak)] += f_k;
    }

    /// Spreads a cosine-space angle force `f_cos = -dV/d(cos θ)` using `1/r`
    /// and `1/r²` factors only; no sine, no trigonometric inverse.
    pub fn spread_g96_angle(
        &mut self,
        f_cos: f64,
        cos_theta: f64,
        r_ij: &Vector3<f64>,
        r_kj: &Vector3<f64>,
        ai: usize,
        aj: usize,
        ak: usize,
    ) {
        let rij_1 = 1.0 / r_ij.norm();
        let rkj_1 = 1.0 / r_kj.norm();
        let rij_2 = rij_1 * rij_1;
        let rkj_2 = rkj_1 * rkj_1;
        let rijrkj_1 = rij_1 * rkj_1;

        let f_i = f_cos * (r_kj * rijrkj_1 - r_ij * rij_2 * cos_theta);
        let f_k = f_cos * (r_ij * rijrkj_1 - r_kj * rkj_2 * cos_theta);
        let f_j = -f_i - f_k;

        self.forces[ai] += f_i;
        self.forces[aj] += f_j;
        self.forces[ak] += f_k;
        self.shift_forces[self.shift_of(ai)] += f_i;
        self.shift_forces[self.shift_of(aj)] += f_j;
        self.shift_forces[self.shift_of(ak)] += f_k;
    }

    /// Spreads a dihedral torque `dvdphi = dV/dφ` over the four atoms.
    ///
    /// The outer atoms take forces along the plane normals `m` and `n`; the
    /// inner pair completes momentum conservation through projections of
    /// `r_ij` and `r_kl` onto the axis `r_kj`. Shared verbatim by the proper,
    /// improper, and Ryckaert-Bellemans kernels.
    pub fn spread_dihedral(
        &mut self,
        dvdphi: f64,
        geom: &DihedralGeometry,
        ai: usize,
        aj: usize,
        ak: usize,
        al: usize,
    ) {
        let nrkj2 = geom.r_kj.norm_squared();
        let nrkj = nrkj2.sqrt();

        let f_i = -(dvdphi * nrkj / geom.m.norm_squared()) * geom.m;
        let f_l = (dvdphi * nrkj / geom.n.norm_squared()) * geom.n;

        let p = geom.r_ij.dot(&geom.r_kj) / nrkj2;
        let q = -geom.r_kl.dot(&geom.r_kj) / nrkj2;
        let svec = p * f_i + q * f_l;

        let f_j = svec - f_i;
        let f_k = -(svec + f_l);

        self.forces[ai] += f_i;
        self.forces[aj] += f_j;
        self.forces[ak] += f_k;
        self.forces[al] += f_l;
        self.shift_forces[self.shift_of(ai)] += f_i;
        self.shift_forces[self.shift_of(aj)] += f_j;
        self.shift_forces[self.shift_of(ak)] += f_k;
        self.shift_forces[self.shift_of(al)] += f_l;
    }
}
