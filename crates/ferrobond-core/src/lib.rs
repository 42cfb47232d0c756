//! # Ferrobond Core Library
//!
//! A library of bonded-interaction kernels for classical particle simulations:
//! two-body bonds, three-body angles, four-body dihedrals, position restraints,
//! excluded 1-4 pairs, and anisotropic water polarization. Each kernel produces
//! potential energies, per-atom forces, virial shift-force contributions, and
//! exact analytic free-energy derivatives (dV/dλ) between two parameter
//! end-states.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict layered architecture to keep the
//! fragile parts (periodic-image geometry, force/virial bookkeeping, and
//! λ-interpolation) isolated, pure, and independently testable.
//!
//! - **[`core`]: The Foundation.** Immutable data models (interaction kinds,
//!   typed instance records, A/B parameter tables) and the stateless force
//!   field mathematics (geometry resolver, free-energy interpolator,
//!   force/virial distributor, per-kind kernels).
//!
//! - **[`engine`]: The Logic Core.** This layer orchestrates one force
//!   evaluation: it holds the evaluation context (periodicity, λ, numerical
//!   policy), the shared output accumulators, and the dispatch driver that
//!   invokes exactly one kernel per interaction kind present in the topology.
//!
//! Topology parsing, neighbor search, domain decomposition, and the general
//! nonbonded pair engine are external collaborators: they supply instance and
//! parameter tables, coordinates, shift indices, and λ, and consume the
//! mutated force arrays, energies, and dV/dλ produced here.

pub mod core;
pub mod engine;
