//! # Kernel Module
//!
//! One evaluation routine per interaction kind. Every kernel follows the same
//! shape: iterate the kind's instance table, resolve periodic-image geometry,
//! evaluate the potential (through the λ-blend where the kind is perturbable),
//! and hand the resulting force scalar to the distributor. Each returns the
//! kind's total potential and accumulates dV/dλ analytically.
//!
//! Kernels are pure functions of their inputs; the only cross-kernel state is
//! the periodicity resolver, which is immutable for the whole pass.

pub mod angles;
pub mod bonds;
pub mod dihedrals;
pub mod pairs;
pub mod polarization;
pub mod restraints;
