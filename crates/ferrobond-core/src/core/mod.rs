//! # Core Module
//!
//! The stateless foundation of the library: data models describing bonded
//! topology and force-field parameters, and the pure mathematics that turns
//! them into energies, forces, and free-energy derivatives.
//!
//! ## Architecture
//!
//! - **Data model** ([`model`]) - Interaction kinds, typed per-kind instance
//!   records, A/B end-state parameter tables, per-atom data, and one-time
//!   topology validation.
//! - **Force field** ([`forcefield`]) - Periodic-image geometry, the harmonic
//!   free-energy interpolator, the force/virial distributor, and one kernel
//!   per interaction kind.
//!
//! Everything in this module is a pure function of its inputs. Mutable state
//! (force arrays, energy accumulators) lives in [`crate::engine`] and is
//! passed in explicitly.

pub mod forcefield;
pub mod model;
