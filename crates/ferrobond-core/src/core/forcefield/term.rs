use crate::core::model::kind::InteractionKind;
use std::ops::{Index, IndexMut};

const N_KINDS: usize = InteractionKind::ALL.len();

/// One potential-energy accumulator per interaction kind.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnergyByKind {
    values: [f64; N_KINDS],
}

impl EnergyByKind {
    pub fn reset(&mut self) {
        self.values = [0.0; N_KINDS];
    }

    #[inline]
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn merge(&mut self, other: &EnergyByKind) {
        for (into, from) in self.values.iter_mut().zip(other.values.iter()) {
            *into += from;
        }
    }
}

impl Index<InteractionKind> for EnergyByKind {
    type Output = f64;

    fn index(&self, kind: InteractionKind) -> &f64 {
        &self.values[kind.index()]
    }
}

impl IndexMut<InteractionKind> for EnergyByKind {
    fn index_mut(&mut self, kind: InteractionKind) -> &mut f64 {
        &mut self.values[kind.index()]
    }
}

/// Per-energy-group-pair Coulomb and Lennard-Jones tallies, fed only by the
/// 1-4 pair kernel. Row-major over (group_i, group_j).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupTallies {
    n_groups: usize,
    coulomb: Vec<f64>,
    lj: Vec<f64>,
}

impl GroupTallies {
    pub fn new(n_groups: usize) -> Self {
        Self {
            n_groups,
            coulomb: vec![0.0; n_groups * n_groups],
            lj: vec![0.0; n_groups * n_groups],
        }
    }

    pub fn n_groups(&self) -> usize {
        self.n_groups
    }

    #[inline]
    fn pair_index(&self, group_i: usize, group_j: usize) -> usize {
        group_i * self.n_groups + group_j
    }

    #[inline]
    pub fn add(&mut self, group_i: usize, group_j: usize, coulomb: f64, lj: f64) {
        let index = self.pair_index(group_i, group_j);
        self.coulomb[index] += coulomb;
        self.lj[index] += lj;
    }

    pub fn coulomb(&self, group_i: usize, group_j: usize) -> f64 {
        self.coulomb[self.pair_index(group_i, group_j)]
    }

    pub fn lj(&self, group_i: usize, group_j: usize) -> f64 {
        self.lj[self.pair_index(group_i, group_j)]
    }

    pub fn reset(&mut self) {
        self.coulomb.fill(0.0);
        self.lj.fill(0.0);
    }

    pub fn merge(&mut self, other: &GroupTallies) {
        debug_assert_eq!(self.n_groups, other.n_groups);
        for (into, from) in self.coulomb.iter_mut().zip(other.coulomb.iter()) {
            *into += from;
        }
        for (into, from) in self.lj.iter_mut().zip(other.lj.iter()) {
            *into += from;
        }
    }
}

/// Per-kind count of instances processed, for performance accounting.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KernelCounters {
    instances: [u64; N_KINDS],
}

impl KernelCounters {
    #[inline]
    pub fn add(&mut self, kind: InteractionKind, n: u64) {
        self.instances[kind.index()] += n;
    }

    pub fn get(&self, kind: InteractionKind) -> u64 {
        self.instances[kind.index()]
    }

    pub fn reset(&mut self) {
        self.instances = [0; N_KINDS];
    }

    pub fn merge(&mut self, other: &KernelCounters) {
        for (into, from) in self.instances.iter_mut().zip(other.instances.iter()) {
            *into += from;
        }
    }
}
