use super::buffers::Accumulators;
use super::context::EvaluationContext;
use super::error::EvaluateError;
use crate::core::forcefield::distribute::ForceSink;
use crate::core::forcefield::kernels;
use crate::core::model::atoms::AtomData;
use crate::core::model::kind::InteractionKind;
use crate::core::model::topology::BondedTopology;
use nalgebra::Vector3;
use tracing::instrument;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

fn check_sizes(
    atoms: &AtomData,
    coords: &[Vector3<f64>],
    shift_index: &[usize],
    out: &Accumulators,
) -> Result<(), EvaluateError> {
    if out.forces.len() != coords.len() {
        return Err(EvaluateError::SizeMismatch {
            what: "force buffer",
            expected: coords.len(),
            actual: out.forces.len(),
        });
    }
    if shift_index.len() != coords.len() {
        return Err(EvaluateError::SizeMismatch {
            what: "shift-index table",
            expected: coords.len(),
            actual: shift_index.len(),
        });
    }
    if atoms.n_atoms() != coords.len() {
        return Err(EvaluateError::SizeMismatch {
            what: "per-atom data",
            expected: coords.len(),
            actual: atoms.n_atoms(),
        });
    }
    if out.group_tallies.n_groups() != atoms.n_energy_groups {
        return Err(EvaluateError::SizeMismatch {
            what: "energy-group tallies",
            expected: atoms.n_energy_groups,
            actual: out.group_tallies.n_groups(),
        });
    }
    Ok(())
}

/// Runs the kernel for one interaction kind and accumulates its outputs.
fn evaluate_kind(
    kind: InteractionKind,
    topology: &BondedTopology,
    atoms: &AtomData,
    coords: &[Vector3<f64>],
    shift_index: &[usize],
    context: &EvaluationContext,
    out: &mut Accumulators,
) -> Result<(), EvaluateError> {
    let n_instances = topology.instance_count(kind);
    if n_instances == 0 {
        return Ok(());
    }

    let Accumulators {
        forces,
        shift_forces,
        energies,
        dvdl,
        group_tallies,
        counters,
    } = out;
    let mut sink = ForceSink {
        forces,
        shift_forces,
        shift_index,
    };
    let pbc = &context.pbc;
    let lambda = context.lambda;

    let v = match kind {
        InteractionKind::HarmonicBond => kernels::bonds::harmonic(
            &topology.harmonic_bonds,
            coords,
            pbc,
            lambda,
            &mut sink,
            dvdl,
        ),
        InteractionKind::MorseBond => {
            kernels::bonds::morse(&topology.morse_bonds, coords, pbc, lambda, &mut sink, dvdl)
        }
        InteractionKind::G96Bond => {
            kernels::bonds::g96_harmonic(&topology.g96_bonds, coords, pbc, lambda, &mut sink, dvdl)
        }
        InteractionKind::HarmonicAngle => kernels::angles::harmonic(
            &topology.harmonic_angles,
            coords,
            pbc,
            lambda,
            context.policy.sine_floor,
            &mut sink,
            dvdl,
        ),
        InteractionKind::G96Angle => {
            kernels::angles::g96(&topology.g96_angles, coords, pbc, lambda, &mut sink, dvdl)
        }
        InteractionKind::ProperDihedral => kernels::dihedrals::proper(
            &topology.proper_dihedrals,
            coords,
            pbc,
            lambda,
            &mut sink,
            dvdl,
        ),
        InteractionKind::ImproperDihedral => kernels::dihedrals::improper(
            &topology.improper_dihedrals,
            coords,
            pbc,
            lambda,
            &mut sink,
            dvdl,
        ),
        InteractionKind::RyckaertBellemans => kernels::dihedrals::ryckaert_bellemans(
            &topology.rb_dihedrals,
            coords,
            pbc,
            lambda,
            context.policy.rb_bound,
            &mut sink,
            dvdl,
        )?,
        InteractionKind::PositionRestraint => {
            kernels::restraints::position(&topology.position_restraints, coords, pbc, &mut sink)
        }
        InteractionKind::Pair14 => kernels::pairs::lj14(
            &topology.pairs_14,
            coords,
            atoms,
            pbc,
            lambda,
            context.pair.epsilon_factor * context.pair.fudge_qq,
            context.pair.cutoff,
            &mut sink,
            group_tallies,
            dvdl,
        ),
        InteractionKind::WaterPolarization => {
            kernels::polarization::water(&topology.water_polarization, coords, &mut sink)
        }
    };

    energies[kind] += v;
    counters.add(kind, n_instances as u64);
    Ok(())
}

/// Evaluates every bonded interaction in the topology.
///
/// Visits the interaction kinds in the fixed order of
/// [`InteractionKind::ALL`], invoking exactly one kernel per non-empty table
/// and accumulating each kernel's potential into the kind's energy slot. The
/// caller zeroes `out` beforehand; this driver only adds. The topology is
/// assumed to have passed [`BondedTopology::validate`] at load time.
#[instrument(skip_all, fields(lambda = context.lambda))]
pub fn evaluate(
    topology: &BondedTopology,
    atoms: &AtomData,
    coords: &[Vector3<f64>],
    shift_index: &[usize],
    context: &EvaluationContext,
    out: &mut Accumulators,
) -> Result<(), EvaluateError> {
    check_sizes(atoms, coords, shift_index, out)?;
    for kind in InteractionKind::ALL {
        evaluate_kind(kind, topology, atoms, coords, shift_index, context, out)?;
    }
    Ok(())
}

/// Parallel variant of [`evaluate`]: one work unit per non-empty kind, each
/// accumulating into its own fresh buffer, reduced serially afterwards. The
/// result equals the serial pass up to floating-point summation order.
#[cfg(feature = "parallel")]
#[instrument(skip_all, fields(lambda = context.lambda))]
pub fn evaluate_parallel(
    topology: &BondedTopology,
    atoms: &AtomData,
    coords: &[Vector3<f64>],
    shift_index: &[usize],
    context: &EvaluationContext,
    out: &mut Accumulators,
) -> Result<(), EvaluateError> {
    check_sizes(atoms, coords, shift_index, out)?;

    let kinds: Vec<InteractionKind> = InteractionKind::ALL
        .into_iter()
        .filter(|kind| topology.instance_count(*kind) > 0)
        .collect();

    let results: Vec<Result<Accumulators, EvaluateError>> = kinds
        .par_iter()
        .map(|&kind| {
            let mut buffer = Accumulators::new(
                coords.len(),
                out.shift_forces.len(),
                atoms.n_energy_groups,
            );
            evaluate_kind(
                kind,
                topology,
                atoms,
                coords,
                shift_index,
                context,
                &mut buffer,
            )?;
            Ok(buffer)
        })
        .collect();

    for result in results {
        out.merge(&result?);
    }
    Ok(())
}
