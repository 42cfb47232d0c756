use crate::core::forcefield::distribute::ForceSink;
use crate::core::forcefield::geometry::Pbc;
use crate::core::forcefield::term::GroupTallies;
use crate::core::model::atoms::AtomData;
use crate::core::model::params::Pair14Params;
use crate::core::model::topology::{BondInstance, KindTable};
use nalgebra::Vector3;
use tracing::warn;

/// Scaled 1-4 pair interactions: Coulomb plus Lennard-Jones between an
/// excluded pair, with λ-blended A/B charge products and c6/c12 parameters
/// and exact analytic dV/dλ for both parts.
///
/// `epsilon` is the electrostatic conversion factor already multiplied by the
/// 1-4 scaling (fudge) factor. A pair whose separation reaches `cutoff` is a
/// topology/cutoff mismatch, not a numerical fault: it is logged with both
/// atoms' indices and positions and the evaluation continues with a defined
/// result.
///
/// Returns the kind's total potential (Coulomb + LJ); the same amounts are
/// also tallied per energy-group pair.
#[allow(clippy::too_many_arguments)]
pub fn lj14(
    table: &KindTable<BondInstance, Pair14Params>,
    coords: &[Vector3<f64>],
    atoms: &AtomData,
    pbc: &Pbc,
    lambda: f64,
    epsilon: f64,
    cutoff: Option<f64>,
    sink: &mut ForceSink,
    tallies: &mut GroupTallies,
    dvdl: &mut f64,
) -> f64 {
    let l1 = 1.0 - lambda;
    let mut vtot = 0.0;

    for instance in &table.instances {
        let p = &table.params[instance.param];
        let (ai, aj) = (instance.ai, instance.aj);

        let dx = pbc.delta(&coords[ai], &coords[aj]);
        let r2 = dx.norm_squared();

        if let Some(rc) = cutoff {
            if r2 >= rc * rc {
                warn!(
                    ai,
                    aj,
                    r = r2.sqrt(),
                    cutoff = rc,
                    xi = ?coords[ai],
                    xj = ?coords[aj],
                    "1-4 pair separation beyond the long-range cutoff; \
                     check topology against the cutoff configuration"
                );
            }
        }

        let rinv = 1.0 / r2.sqrt();
        let rinv6 = (rinv * rinv).powi(3);
        let rinv12 = rinv6 * rinv6;

        let qq_a = atoms.charge[ai].a * atoms.charge[aj].a;
        let qq_b = atoms.charge[ai].b * atoms.charge[aj].b;
        let qq = l1 * qq_a + lambda * qq_b;

        let vcoul = epsilon * qq * rinv;
        let vdisp = p.c6.at(lambda) * rinv6;
        let vrep = p.c12.at(lambda) * rinv12;
        let vlj = vrep - vdisp;

        *dvdl += epsilon * (qq_b - qq_a) * rinv + p.c12.delta() * rinv12 - p.c6.delta() * rinv6;

        tallies.add(
            atoms.energy_group[ai],
            atoms.energy_group[aj],
            vcoul,
            vlj,
        );
        vtot += vcoul + vlj;

        let fscal = (vcoul + 12.0 * vrep - 6.0 * vdisp) / r2;
        sink.spread_pair(fscal, &dx, ai, aj);
    }
    vtot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::params::AB;

    const TOLERANCE: f64 = 1e-9;

    fn pair_table(param: Pair14Params) -> KindTable<BondInstance, Pair14Params> {
        KindTable {
            instances: vec![BondInstance {
                ai: 0,
                aj: 1,
                param: 0,
            }],
            params: vec![param],
        }
    }

    fn charged_atoms(qi: f64, qj: f64) -> AtomData {
        AtomData {
            charge: vec![AB::fixed(qi), AB::fixed(qj)],
            energy_group: vec![0, 1],
            n_energy_groups: 2,
        }
    }

    fn run(
        table: &KindTable<BondInstance, Pair14Params>,
        atoms: &AtomData,
        coords: &[Vector3<f64>],
        lambda: f64,
        cutoff: Option<f64>,
    ) -> (f64, Vec<Vector3<f64>>, GroupTallies, f64) {
        let mut forces = vec![Vector3::zeros(); coords.len()];
        let mut shifts = vec![Vector3::zeros(); 1];
        let shift_index = vec![0; coords.len()];
        let mut tallies = GroupTallies::new(atoms.n_energy_groups);
        let mut dvdl = 0.0;
        let mut sink = ForceSink {
            forces: &mut forces,
            shift_forces: &mut shifts,
            shift_index: &shift_index,
        };
        let v = lj14(
            table,
            coords,
            atoms,
            &Pbc::none(),
            lambda,
            138.935485,
            cutoff,
            &mut sink,
            &mut tallies,
            &mut dvdl,
        );
        (v, forces, tallies, dvdl)
    }

    #[test]
    fn like_charges_repel() {
        let table = pair_table(Pair14Params {
            c6: AB::fixed(0.0),
            c12: AB::fixed(0.0),
        });
        let atoms = charged_atoms(0.5, 0.5);
        let coords = vec![Vector3::zeros(), Vector3::new(0.3, 0.0, 0.0)];

        let (v, forces, _, _) = run(&table, &atoms, &coords, 0.0, None);

        assert!(v > 0.0);
        // Atom 0 pushed away from atom 1, toward negative x.
        assert!(forces[0].x < 0.0);
        assert!((forces[0] + forces[1]).norm() < TOLERANCE);
    }

    #[test]
    fn pure_coulomb_energy_matches_closed_form() {
        let table = pair_table(Pair14Params {
            c6: AB::fixed(0.0),
            c12: AB::fixed(0.0),
        });
        let atoms = charged_atoms(0.4, -0.3);
        let coords = vec![Vector3::zeros(), Vector3::new(0.25, 0.0, 0.0)];

        let (v, _, tallies, _) = run(&table, &atoms, &coords, 0.0, None);

        let expected = 138.935485 * 0.4 * -0.3 / 0.25;
        assert!((v - expected).abs() < 1e-6);
        assert!((tallies.coulomb(0, 1) - expected).abs() < 1e-6);
        assert_eq!(tallies.coulomb(1, 0), 0.0);
        assert_eq!(tallies.lj(0, 1), 0.0);
    }

    #[test]
    fn lj_minimum_gives_attractive_then_repulsive_force() {
        // c6/c12 chosen so the minimum sits at r = 0.3.
        let rmin6 = 0.3f64.powi(6);
        let c12 = rmin6 * rmin6;
        let c6 = 2.0 * rmin6;
        let table = pair_table(Pair14Params {
            c6: AB::fixed(c6),
            c12: AB::fixed(c12),
        });
        let atoms = charged_atoms(0.0, 0.0);

        let near = vec![Vector3::zeros(), Vector3::new(0.25, 0.0, 0.0)];
        let (_, forces_near, _, _) = run(&table, &atoms, &near, 0.0, None);
        // Inside the minimum: repulsive, atom 0 pushed to negative x.
        assert!(forces_near[0].x < 0.0);

        let far = vec![Vector3::zeros(), Vector3::new(0.45, 0.0, 0.0)];
        let (_, forces_far, _, _) = run(&table, &atoms, &far, 0.0, None);
        // Outside the minimum: attractive.
        assert!(forces_far[0].x > 0.0);
    }

    #[test]
    fn beyond_cutoff_still_produces_defined_result() {
        let table = pair_table(Pair14Params {
            c6: AB::fixed(1e-3),
            c12: AB::fixed(1e-6),
        });
        let atoms = charged_atoms(0.2, 0.2);
        let coords = vec![Vector3::zeros(), Vector3::new(2.5, 0.0, 0.0)];

        // Separation well beyond the 0.9 cutoff; the kernel warns but must
        // not abort or poison the outputs.
        let (v, forces, _, dvdl) = run(&table, &atoms, &coords, 0.0, Some(0.9));

        assert!(v.is_finite());
        assert!(dvdl.is_finite());
        assert!(forces[0].x.is_finite());
        assert!((forces[0] + forces[1]).norm() < TOLERANCE);
    }

    #[test]
    fn dvdl_matches_finite_difference_for_perturbed_pair() {
        let table = pair_table(Pair14Params {
            c6: AB::new(1e-3, 2e-3),
            c12: AB::new(1e-6, 3e-6),
        });
        let atoms = AtomData {
            charge: vec![AB::new(0.3, -0.1), AB::new(-0.2, 0.4)],
            energy_group: vec![0, 0],
            n_energy_groups: 1,
        };
        let coords = vec![Vector3::zeros(), Vector3::new(0.28, 0.0, 0.0)];
        let lambda = 0.35;
        let h = 1e-7;

        let (_, _, _, analytic) = run(&table, &atoms, &coords, lambda, None);
        let (v_plus, _, _, _) = run(&table, &atoms, &coords, lambda + h, None);
        let (v_minus, _, _, _) = run(&table, &atoms, &coords, lambda - h, None);
        let numeric = (v_plus - v_minus) / (2.0 * h);
        assert!((analytic - numeric).abs() < 1e-4);
    }
}
