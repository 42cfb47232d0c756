//! # Data Model Module
//!
//! Immutable descriptions of what the force core computes on: the closed set
//! of interaction kinds, the per-kind parameter records with their A/B
//! end-states, the strongly-typed instance records binding atoms to
//! parameters, and per-atom data consumed by the 1-4 pair kernel.
//!
//! Tables are built once by an external topology loader, validated once via
//! [`topology::BondedTopology::validate`], and treated as read-only for the
//! lifetime of a force evaluation.

pub mod atoms;
pub mod kind;
pub mod params;
pub mod topology;
