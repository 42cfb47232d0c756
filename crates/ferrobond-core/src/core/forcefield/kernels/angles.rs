use crate::core::forcefield::blend::harmonic_blend;
use crate::core::forcefield::distribute::ForceSink;
use crate::core::forcefield::geometry::{Pbc, bond_angle, cos_angle};
use crate::core::model::params::HarmonicParams;
use crate::core::model::topology::{AngleInstance, KindTable};
use nalgebra::Vector3;

/// Harmonic angles: λ-blended spring on the angle at the vertex atom.
/// References are stored in degrees and converted once per instance.
pub fn harmonic(
    table: &KindTable<AngleInstance, HarmonicParams>,
    coords: &[Vector3<f64>],
    pbc: &Pbc,
    lambda: f64,
    sine_floor: f64,
    sink: &mut ForceSink,
    dvdl: &mut f64,
) -> f64 {
    let mut vtot = 0.0;
    for instance in &table.instances {
        let p = &table.params[instance.param];
        let (theta, cos_theta, r_ij, r_kj) = bond_angle(
            pbc,
            &coords[instance.ai],
            &coords[instance.aj],
            &coords[instance.ak],
        );

        let out = harmonic_blend(p.k, p.x0.scaled(std::f64::consts::PI / 180.0), theta, lambda);
        *dvdl += out.dvdl;
        vtot += out.energy;

        sink.spread_angle(
            out.force,
            theta,
            cos_theta,
            &r_ij,
            &r_kj,
            instance.ai,
            instance.aj,
            instance.ak,
            sine_floor,
        );
    }
    vtot
}

/// GROMOS-96 angles: λ-blended spring directly on cos θ. No trigonometric
/// inverse anywhere; the force projection works from `1/r` and `1/r²`
/// factors, so no sine floor is needed either.
pub fn g96(
    table: &KindTable<AngleInstance, HarmonicParams>,
    coords: &[Vector3<f64>],
    pbc: &Pbc,
    lambda: f64,
    sink: &mut ForceSink,
    dvdl: &mut f64,
) -> f64 {
    let mut vtot = 0.0;
    for instance in &table.instances {
        let p = &table.params[instance.param];
        let r_ij = pbc.delta(&coords[instance.ai], &coords[instance.aj]);
        let r_kj = pbc.delta(&coords[instance.ak], &coords[instance.aj]);
        let cos_theta = cos_angle(&r_ij, &r_kj);

        let out = harmonic_blend(p.k, p.x0, cos_theta, lambda);
        *dvdl += out.dvdl;
        vtot += out.energy;

        sink.spread_g96_angle(
            out.force,
            cos_theta,
            &r_ij,
            &r_kj,
            instance.ai,
            instance.aj,
            instance.ak,
        );
    }
    vtot
}
