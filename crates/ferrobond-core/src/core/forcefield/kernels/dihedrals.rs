use crate::core::forcefield::blend::harmonic_blend;
use crate::core::forcefield::distribute::ForceSink;
use crate::core::forcefield::geometry::{Pbc, dihedral_angle};
use crate::core::model::params::{HarmonicParams, PeriodicDihedralParams, RbParams};
use crate::core::model::topology::{DihedralInstance, KindTable};
use nalgebra::Vector3;
use std::f64::consts::PI;
use thiserror::Error;

const DEG2RAD: f64 = PI / 180.0;

/// A Ryckaert-Bellemans intermediate left the sane numerical range.
///
/// Continuing would feed corrupted forces into the integrator, so the whole
/// evaluation aborts; the caller decides whether that ends the process. This
/// never indicates a transient condition: it means invalid parameters or a
/// diverged trajectory.
#[derive(Debug, Error, Clone, PartialEq)]
#[error(
    "{term} = {value:e} is NaN or outside ±{bound:e} in Ryckaert-Bellemans \
     dihedral over atoms {atoms:?}"
)]
pub struct NumericalDivergence {
    pub term: &'static str,
    pub value: f64,
    pub bound: f64,
    pub atoms: [usize; 4],
}

#[inline]
fn check(
    term: &'static str,
    value: f64,
    bound: f64,
    atoms: [usize; 4],
) -> Result<(), NumericalDivergence> {
    if !value.is_finite() || value < -bound || value > bound {
        return Err(NumericalDivergence {
            term,
            value,
            bound,
            atoms,
        });
    }
    Ok(())
}

/// Scalar part of the proper periodic dihedral:
/// `V = cp·(1 + cos(mult·φ - φ0))` with λ-blended barrier and phase.
/// Returns `(V, dV/dφ, dV/dλ)`.
fn periodic_torque(p: &PeriodicDihedralParams, phi: f64, lambda: f64) -> (f64, f64, f64) {
    let ph0 = p.phase_deg.at(lambda) * DEG2RAD;
    let cp = p.barrier.at(lambda);
    let mult = p.multiplicity as f64;

    let mdphi = mult * phi - ph0;
    let sdphi = mdphi.sin();
    let v1 = 1.0 + mdphi.cos();

    let v = cp * v1;
    let dvdphi = -cp * mult * sdphi;
    let dvdl = p.barrier.delta() * v1 + cp * p.phase_deg.delta() * DEG2RAD * sdphi;

    (v, dvdphi, dvdl)
}

/// Proper periodic dihedrals.
pub fn proper(
    table: &KindTable<DihedralInstance, PeriodicDihedralParams>,
    coords: &[Vector3<f64>],
    pbc: &Pbc,
    lambda: f64,
    sink: &mut ForceSink,
    dvdl: &mut f64,
) -> f64 {
    let mut vtot = 0.0;
    for instance in &table.instances {
        let p = &table.params[instance.param];
        let geom = dihedral_angle(
            pbc,
            &coords[instance.ai],
            &coords[instance.aj],
            &coords[instance.ak],
            &coords[instance.al],
        );

        let (v, dvdphi, dvdl_inst) = periodic_torque(p, geom.phi, lambda);
        *dvdl += dvdl_inst;
        vtot += v;

        sink.spread_dihedral(
            dvdphi,
            &geom,
            instance.ai,
            instance.aj,
            instance.ak,
            instance.al,
        );
    }
    vtot
}

/// Improper dihedrals: λ-blended harmonic about a reference angle, with the
/// reference stored in degrees. Reuses the shared dihedral force
/// distribution; only the scalar dV/dφ differs.
pub fn improper(
    table: &KindTable<DihedralInstance, HarmonicParams>,
    coords: &[Vector3<f64>],
    pbc: &Pbc,
    lambda: f64,
    sink: &mut ForceSink,
    dvdl: &mut f64,
) -> f64 {
    let mut vtot = 0.0;
    for instance in &table.instances {
        let p = &table.params[instance.param];
        let geom = dihedral_angle(
            pbc,
            &coords[instance.ai],
            &coords[instance.aj],
            &coords[instance.ak],
            &coords[instance.al],
        );

        let out = harmonic_blend(p.k, p.x0.scaled(DEG2RAD), geom.phi, lambda);
        *dvdl += out.dvdl;
        vtot += out.energy;

        // The blend returns the restoring force -dV/dφ; the distributor wants
        // dV/dφ.
        sink.spread_dihedral(
            -out.force,
            &geom,
            instance.ai,
            instance.aj,
            instance.ak,
            instance.al,
        );
    }
    vtot
}

/// Ryckaert-Bellemans dihedrals: six-term polynomial in cos ψ under the
/// polymer convention (ψ = φ - π), with λ-blended coefficients and a fatal
/// divergence guard on every intermediate.
pub fn ryckaert_bellemans(
    table: &KindTable<DihedralInstance, RbParams>,
    coords: &[Vector3<f64>],
    pbc: &Pbc,
    lambda: f64,
    bound: f64,
    sink: &mut ForceSink,
    dvdl: &mut f64,
) -> Result<f64, NumericalDivergence> {
    let mut vtot = 0.0;
    for instance in &table.instances {
        let p = &table.params[instance.param];
        let atoms = [instance.ai, instance.aj, instance.ak, instance.al];
        let geom = dihedral_angle(
            pbc,
            &coords[instance.ai],
            &coords[instance.aj],
            &coords[instance.ak],
            &coords[instance.al],
        );

        // Polymer convention: trans at ψ = 0.
        let psi = if geom.phi < 0.0 {
            geom.phi + PI
        } else {
            geom.phi - PI
        };
        let cos_psi = -geom.cos_phi;
        let sin_psi = psi.sin();
        check("psi", psi, bound, atoms)?;
        check("cos_psi", cos_psi, bound, atoms)?;

        // Energy, dV/dφ, and dV/dλ accumulated together over increasing
        // powers of cos ψ.
        let c0 = p.c[0].at(lambda);
        let mut v = c0;
        let mut dvdl_inst = p.c[0].delta();
        let mut dsum = 0.0;
        let mut cosfac = 1.0;

        for (power, coefficient) in p.c.iter().enumerate().skip(1) {
            let rbp = coefficient.at(lambda);
            dsum += power as f64 * rbp * cosfac;
            cosfac *= cos_psi;
            check("cosfac", cosfac, bound, atoms)?;
            v += cosfac * rbp;
            dvdl_inst += coefficient.delta() * cosfac;
        }

        let dvdphi = -dsum * sin_psi;
        check("dvdphi", dvdphi, bound, atoms)?;
        check("v", v, bound, atoms)?;

        *dvdl += dvdl_inst;
        vtot += v;

        sink.spread_dihedral(
            dvdphi,
            &geom,
            instance.ai,
            instance.aj,
            instance.ak,
            instance.al,
        );
    }
    Ok(vtot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::params::AB;

    const TOLERANCE: f64 = 1e-9;

    fn fixture(
        n_atoms: usize,
    ) -> (Vec<Vector3<f64>>, Vec<Vector3<f64>>, Vec<usize>) {
        (
            vec![Vector3::zeros(); n_atoms],
            vec![Vector3::zeros(); 1],
            vec![0; n_atoms],
        )
    }

    fn dihedral_instances() -> Vec<DihedralInstance> {
        vec![DihedralInstance {
            ai: 0,
            aj: 1,
            ak: 2,
            al: 3,
            param: 0,
        }]
    }

    fn twisted_coords() -> Vec<Vector3<f64>> {
        vec![
            Vector3::new(0.0, 0.1, 0.05),
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.15, 0.0, 0.0),
            Vector3::new(0.15, 0.1, -0.07),
        ]
    }

    fn net_force(forces: &[Vector3<f64>]) -> Vector3<f64> {
        forces.iter().sum()
    }

    #[test]
    fn proper_dihedral_forces_conserve_momentum() {
        let table = KindTable {
            instances: dihedral_instances(),
            params: vec![PeriodicDihedralParams {
                barrier: AB::fixed(10.0),
                phase_deg: AB::fixed(0.0),
                multiplicity: 3,
            }],
        };
        let coords = twisted_coords();
        let (mut forces, mut shifts, shift_index) = fixture(4);
        let mut sink = ForceSink {
            forces: &mut forces,
            shift_forces: &mut shifts,
            shift_index: &shift_index,
        };
        let mut dvdl = 0.0;

        let v = proper(&table, &coords, &Pbc::none(), 0.0, &mut sink, &mut dvdl);

        assert!(v >= 0.0);
        assert!(net_force(&forces).norm() < 1e-10);
        assert!(dvdl.abs() < TOLERANCE);
    }

    #[test]
    fn periodic_torque_dvdl_matches_finite_difference() {
        let p = PeriodicDihedralParams {
            barrier: AB::new(8.0, 12.0),
            phase_deg: AB::new(0.0, 60.0),
            multiplicity: 2,
        };
        let phi = 0.7;
        let lambda = 0.45;
        let h = 1e-7;

        let (_, _, analytic) = periodic_torque(&p, phi, lambda);
        let (v_plus, _, _) = periodic_torque(&p, phi, lambda + h);
        let (v_minus, _, _) = periodic_torque(&p, phi, lambda - h);
        let numeric = (v_plus - v_minus) / (2.0 * h);
        assert!((analytic - numeric).abs() < 1e-5);
    }

    #[test]
    fn periodic_torque_is_negative_gradient() {
        let p = PeriodicDihedralParams {
            barrier: AB::fixed(10.0),
            phase_deg: AB::fixed(30.0),
            multiplicity: 3,
        };
        let phi = -1.1;
        let h = 1e-7;

        let (_, dvdphi, _) = periodic_torque(&p, phi, 0.0);
        let (v_plus, _, _) = periodic_torque(&p, phi + h, 0.0);
        let (v_minus, _, _) = periodic_torque(&p, phi - h, 0.0);
        let numeric = (v_plus - v_minus) / (2.0 * h);
        assert!((dvdphi - numeric).abs() < 1e-5);
    }

    #[test]
    fn improper_dihedral_forces_conserve_momentum() {
        let table = KindTable {
            instances: dihedral_instances(),
            params: vec![HarmonicParams {
                k: AB::fixed(50.0),
                x0: AB::fixed(0.0),
            }],
        };
        let coords = twisted_coords();
        let (mut forces, mut shifts, shift_index) = fixture(4);
        let mut sink = ForceSink {
            forces: &mut forces,
            shift_forces: &mut shifts,
            shift_index: &shift_index,
        };
        let mut dvdl = 0.0;

        let v = improper(&table, &coords, &Pbc::none(), 0.0, &mut sink, &mut dvdl);

        assert!(v > 0.0);
        assert!(net_force(&forces).norm() < 1e-10);
    }

    #[test]
    fn rb_with_only_constant_term_is_flat() {
        let mut c = [AB::fixed(0.0); 6];
        c[0] = AB::fixed(9.28);
        let table = KindTable {
            instances: dihedral_instances(),
            params: vec![RbParams { c }],
        };
        let coords = twisted_coords();
        let (mut forces, mut shifts, shift_index) = fixture(4);
        let mut sink = ForceSink {
            forces: &mut forces,
            shift_forces: &mut shifts,
            shift_index: &shift_index,
        };
        let mut dvdl = 0.0;

        let v = ryckaert_bellemans(
            &table,
            &coords,
            &Pbc::none(),
            0.0,
            1e10,
            &mut sink,
            &mut dvdl,
        )
        .expect("flat RB potential must evaluate");

        assert!((v - 9.28).abs() < TOLERANCE);
        for f in &forces {
            assert!(f.norm() < TOLERANCE);
        }
    }

    #[test]
    fn rb_forces_conserve_momentum() {
        let c = [
            AB::fixed(9.28),
            AB::fixed(12.16),
            AB::fixed(-13.12),
            AB::fixed(-3.06),
            AB::fixed(26.24),
            AB::fixed(-31.5),
        ];
        let table = KindTable {
            instances: dihedral_instances(),
            params: vec![RbParams { c }],
        };
        let coords = twisted_coords();
        let (mut forces, mut shifts, shift_index) = fixture(4);
        let mut sink = ForceSink {
            forces: &mut forces,
            shift_forces: &mut shifts,
            shift_index: &shift_index,
        };
        let mut dvdl = 0.0;

        let v = ryckaert_bellemans(
            &table,
            &coords,
            &Pbc::none(),
            0.0,
            1e10,
            &mut sink,
            &mut dvdl,
        )
        .expect("well-formed RB dihedral must evaluate");

        assert!(v.is_finite());
        assert!(net_force(&forces).norm() < 1e-10);
        assert!(dvdl.abs() < TOLERANCE);
    }

    #[test]
    fn rb_blended_coefficients_give_polynomial_dvdl() {
        let c = [
            AB::new(1.0, 2.0),
            AB::new(0.5, 1.5),
            AB::new(0.0, 0.0),
            AB::new(-1.0, 1.0),
            AB::new(0.0, 0.0),
            AB::new(0.0, 0.0),
        ];
        let table = KindTable {
            instances: dihedral_instances(),
            params: vec![RbParams { c }],
        };
        let coords = twisted_coords();
        let lambda = 0.3;

        let geom = dihedral_angle(
            &Pbc::none(),
            &coords[0],
            &coords[1],
            &coords[2],
            &coords[3],
        );
        let cos_psi = -geom.cos_phi;
        let expected: f64 = (0..6)
            .map(|j| c[j].delta() * cos_psi.powi(j as i32))
            .sum();

        let (mut forces, mut shifts, shift_index) = fixture(4);
        let mut sink = ForceSink {
            forces: &mut forces,
            shift_forces: &mut shifts,
            shift_index: &shift_index,
        };
        let mut dvdl = 0.0;
        ryckaert_bellemans(
            &table,
            &coords,
            &Pbc::none(),
            lambda,
            1e10,
            &mut sink,
            &mut dvdl,
        )
        .expect("well-formed RB dihedral must evaluate");

        assert!((dvdl - expected).abs() < TOLERANCE);
    }

    #[test]
    fn rb_divergence_guard_rejects_absurd_coefficients() {
        let mut c = [AB::fixed(0.0); 6];
        c[5] = AB::fixed(1e12);
        let table = KindTable {
            instances: dihedral_instances(),
            params: vec![RbParams { c }],
        };
        let coords = twisted_coords();
        let (mut forces, mut shifts, shift_index) = fixture(4);
        let mut sink = ForceSink {
            forces: &mut forces,
            shift_forces: &mut shifts,
            shift_index: &shift_index,
        };
        let mut dvdl = 0.0;

        let result = ryckaert_bellemans(
            &table,
            &coords,
            &Pbc::none(),
            0.0,
            1e10,
            &mut sink,
            &mut dvdl,
        );

        let err = result.expect_err("divergence guard must trip");
        assert_eq!(err.atoms, [0, 1, 2, 3]);
    }

    #[test]
    fn rb_divergence_guard_rejects_nan_coordinates() {
        let mut c = [AB::fixed(0.0); 6];
        c[1] = AB::fixed(1.0);
        let table = KindTable {
            instances: dihedral_instances(),
            params: vec![RbParams { c }],
        };
        let mut coords = twisted_coords();
        coords[0].x = f64::NAN;
        let (mut forces, mut shifts, shift_index) = fixture(4);
        let mut sink = ForceSink {
            forces: &mut forces,
            shift_forces: &mut shifts,
            shift_index: &shift_index,
        };
        let mut dvdl = 0.0;

        let result = ryckaert_bellemans(
            &table,
            &coords,
            &Pbc::none(),
            0.0,
            1e10,
            &mut sink,
            &mut dvdl,
        );
        assert!(result.is_err());
    }
}
