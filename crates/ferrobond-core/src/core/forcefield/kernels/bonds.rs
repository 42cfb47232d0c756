use crate::core::forcefield::blend::harmonic_blend;
use crate::core::forcefield::distribute::ForceSink;
use crate::core::forcefield::geometry::Pbc;
use crate::core::model::params::{HarmonicParams, MorseParams};
use crate::core::model::topology::{BondInstance, KindTable};
use nalgebra::Vector3;

/// Harmonic bonds: λ-blended spring on the interatomic distance.
pub fn harmonic(
    table: &KindTable<BondInstance, HarmonicParams>,
    coords: &[Vector3<f64>],
    pbc: &Pbc,
    lambda: f64,
    sink: &mut ForceSink,
    dvdl: &mut f64,
) -> f64 {
    let mut vtot = 0.0;
    for instance in &table.instances {
        let p = &table.params[instance.param];
        let dx = pbc.delta(&coords[instance.ai], &coords[instance.aj]);
        let dr2 = dx.norm_squared();
        let dr = dr2.sqrt();

        let out = harmonic_blend(p.k, p.x0, dr, lambda);
        *dvdl += out.dvdl;

        // Coincident atoms give no force direction; the λ coupling above is
        // still well-defined.
        if dr2 == 0.0 {
            continue;
        }

        vtot += out.energy;
        sink.spread_pair(out.force / dr, &dx, instance.ai, instance.aj);
    }
    vtot
}

/// Morse bonds: `V = depth·(1 - e^{-β(r - b0)})²` with λ-blended parameters.
pub fn morse(
    table: &KindTable<BondInstance, MorseParams>,
    coords: &[Vector3<f64>],
    pbc: &Pbc,
    lambda: f64,
    sink: &mut ForceSink,
    dvdl: &mut f64,
) -> f64 {
    let mut vtot = 0.0;
    for instance in &table.instances {
        let p = &table.params[instance.param];
        let b0 = p.b0.at(lambda);
        let beta = p.beta.at(lambda);
        let depth = p.depth.at(lambda);

        let dx = pbc.delta(&coords[instance.ai], &coords[instance.aj]);
        let dr = dx.norm();
        let temp = (-beta * (dr - b0)).exp();

        // Exactly at the minimum: zero energy, zero force, and nothing to
        // divide by.
        if temp == 1.0 {
            continue;
        }

        let omtemp = 1.0 - temp;
        let vbond = depth * omtemp * omtemp;
        let fbond = -2.0 * beta * temp * depth * omtemp / dr;

        *dvdl += p.depth.delta() * omtemp * omtemp
            + 2.0 * depth * omtemp * temp * (p.beta.delta() * (dr - b0) - beta * p.b0.delta());

        vtot += vbond;
        sink.spread_pair(fbond, &dx, instance.ai, instance.aj);
    }
    vtot
}

/// GROMOS-96 bonds: λ-blended spring on the *squared* distance, making the
/// potential quartic in r and avoiding the square root entirely.
pub fn g96_harmonic(
    table: &KindTable<BondInstance, HarmonicParams>,
    coords: &[Vector3<f64>],
    pbc: &Pbc,
    lambda: f64,
    sink: &mut ForceSink,
    dvdl: &mut f64,
) -> f64 {
    let mut vtot = 0.0;
    for instance in &table.instances {
        let p = &table.params[instance.param];
        let dx = pbc.delta(&coords[instance.ai], &coords[instance.aj]);
        let dr2 = dx.norm_squared();

        let out = harmonic_blend(p.k, p.x0, dr2, lambda);
        *dvdl += out.dvdl;
        vtot += out.energy;

        // dV/d(r²) · d(r²)/dr picks up a factor two on the displacement.
        sink.spread_pair(2.0 * out.force, &dx, instance.ai, instance.aj);
    }
    vtot
}
