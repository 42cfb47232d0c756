use crate::core::forcefield::term::{EnergyByKind, GroupTallies, KernelCounters};
use nalgebra::Vector3;

/// Caller-owned outputs of one force evaluation.
///
/// The caller zeroes these (via [`Accumulators::reset`] or fresh allocation)
/// before each pass; the engine only ever accumulates into them. The
/// shift-force table is indexed by the externally supplied per-atom shift
/// indices.
#[derive(Debug, Clone, PartialEq)]
pub struct Accumulators {
    pub forces: Vec<Vector3<f64>>,
    pub shift_forces: Vec<Vector3<f64>>,
    pub energies: EnergyByKind,
    pub dvdl: f64,
    pub group_tallies: GroupTallies,
    pub counters: KernelCounters,
}

impl Accumulators {
    pub fn new(n_atoms: usize, n_shift_vectors: usize, n_energy_groups: usize) -> Self {
        Self {
            forces: vec![Vector3::zeros(); n_atoms],
            shift_forces: vec![Vector3::zeros(); n_shift_vectors],
            energies: EnergyByKind::default(),
            dvdl: 0.0,
            group_tallies: GroupTallies::new(n_energy_groups),
            counters: KernelCounters::default(),
        }
    }

    pub fn reset(&mut self) {
        self.forces.fill(Vector3::zeros());
        self.shift_forces.fill(Vector3::zeros());
        self.energies.reset();
        self.dvdl = 0.0;
        self.group_tallies.reset();
        self.counters.reset();
    }

    /// Adds another accumulator set into this one. Used to reduce per-worker
    /// buffers serially after a parallel pass.
    pub fn merge(&mut self, other: &Accumulators) {
        debug_assert_eq!(self.forces.len(), other.forces.len());
        debug_assert_eq!(self.shift_forces.len(), other.shift_forces.len());
        for (into, from) in self.forces.iter_mut().zip(other.forces.iter()) {
            *into += from;
        }
        for (into, from) in self.shift_forces.iter_mut().zip(other.shift_forces.iter()) {
            *into += from;
        }
        self.energies.merge(&other.energies);
        self.dvdl += other.dvdl;
        self.group_tallies.merge(&other.group_tallies);
        self.counters.merge(&other.counters);
    }
}
