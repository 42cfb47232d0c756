use crate::core::forcefield::distribute::ForceSink;
use crate::core::forcefield::geometry::Pbc;
use crate::core::model::params::PositionRestraintParams;
use crate::core::model::topology::{KindTable, RestraintInstance};
use nalgebra::Vector3;

/// Position restraints: independent per-axis harmonics pulling each
/// restrained atom toward its reference point. No λ coupling, and the
/// reference offset only uses the minimum image; reference points never enter
/// the shift table.
pub fn position(
    table: &KindTable<RestraintInstance, PositionRestraintParams>,
    coords: &[Vector3<f64>],
    pbc: &Pbc,
    sink: &mut ForceSink,
) -> f64 {
    let mut vtot = 0.0;
    for instance in &table.instances {
        let p = &table.params[instance.param];
        let dx = pbc.delta(&coords[instance.ai], &p.reference);

        let mut v = 0.0;
        let mut f = Vector3::zeros();
        for axis in 0..3 {
            f[axis] = -p.fc[axis] * dx[axis];
            v += 0.5 * p.fc[axis] * dx[axis] * dx[axis];
        }

        sink.add_unshifted(instance.ai, f);
        vtot += v;
    }
    vtot
}
