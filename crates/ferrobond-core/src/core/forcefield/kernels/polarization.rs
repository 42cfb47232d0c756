use crate::core::forcefield::distribute::ForceSink;
use crate::core::model::params::WaterPolParams;
use crate::core::model::topology::{KindTable, WaterPolInstance};
use nalgebra::Vector3;

/// Anisotropic water polarization: a shell particle bound to a dummy through
/// springs that differ along the three axes of the molecular frame.
///
/// The frame is built from real geometry: the plane normal of the two O-H
/// vectors, the H1-H2 direction (scaled by the reference 1/r_HH), and the
/// normalized O-dummy direction. The dummy-shell displacement is projected
/// onto these axes Gram-Schmidt style and each component feels its own
/// spring: `V = ½·Σ k_axis·d_axis²`.
///
/// Only the shell and the dummy receive force; the oxygen and hydrogens are
/// read-only reference geometry for this instance. That asymmetry is the
/// model, not an oversight.
pub fn water(
    table: &KindTable<WaterPolInstance, WaterPolParams>,
    coords: &[Vector3<f64>],
    sink: &mut ForceSink,
) -> f64 {
    let mut vtot = 0.0;
    for instance in &table.instances {
        let p = &table.params[instance.param];

        let d_oh1 = coords[instance.h1] - coords[instance.oxygen];
        let d_oh2 = coords[instance.h2] - coords[instance.oxygen];
        let d_hh = coords[instance.h2] - coords[instance.h1];
        let d_od = coords[instance.dummy] - coords[instance.oxygen];
        let d_ds = coords[instance.shell] - coords[instance.dummy];

        // Frame axes: plane normal, in-plane H-H, and the O-dummy direction.
        // The H-H axis is scaled by the reference distance from the
        // parameters, the other two by their actual lengths.
        let mut normal = d_oh1.cross(&d_oh2);
        normal *= 1.0 / normal.norm();
        let axis_hh = d_hh / p.r_hh;
        let axis_od = d_od / d_od.norm();

        let dz = d_ds.dot(&axis_od);
        let mut proj = d_ds - dz * axis_od;
        let dxx = proj.dot(&normal);
        proj -= dxx * normal;
        let dyy = proj.dot(&axis_hh);

        let kdx = Vector3::new(p.kx * dxx, p.ky * dyy, p.kz * dz);
        vtot += dxx * kdx.x + dyy * kdx.y + dz * kdx.z;

        let fij = -(kdx.x * normal + kdx.y * axis_hh + kdx.z * axis_od);
        sink.add_unshifted(instance.shell, fij);
        sink.add_unshifted(instance.dummy, -fij);
    }
    0.5 * vtot
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn water_params() -> WaterPolParams {
        WaterPolParams {
            kx: 500.0,
            ky: 600.0,
            kz: 700.0,
            r_hh: 0.15,
            r_od: 0.05,
        }
    }

    /// O at origin, hydrogens in the xy plane, dummy along +y.
    fn water_coords(shell_offset: Vector3<f64>) -> Vec<Vector3<f64>> {
        let dummy = Vector3::new(0.0, 0.05, 0.0);
        vec![
            Vector3::zeros(),
            Vector3::new(0.075, 0.06, 0.0),
            Vector3::new(-0.075, 0.06, 0.0),
            dummy,
            dummy + shell_offset,
        ]
    }

    fn table() -> KindTable<WaterPolInstance, WaterPolParams> {
        KindTable {
            instances: vec![WaterPolInstance {
                oxygen: 0,
                h1: 1,
                h2: 2,
                dummy: 3,
                shell: 4,
                param: 0,
            }],
            params: vec![water_params()],
        }
    }

    fn run(coords: &[Vector3<f64>]) -> (f64, Vec<Vector3<f64>>) {
        let mut forces = vec![Vector3::zeros(); coords.len()];
        let mut shifts = vec![Vector3::zeros(); 1];
        let shift_index = vec![0; coords.len()];
        let mut sink = ForceSink {
            forces: &mut forces,
            shift_forces: &mut shifts,
            shift_index: &shift_index,
        };
        let v = water(&table(), coords, &mut sink);
        (v, forces)
    }

    #[test]
    fn shell_on_dummy_is_relaxed() {
        let (v, forces) = run(&water_coords(Vector3::zeros()));
        assert!(v.abs() < TOLERANCE);
        for f in &forces {
            assert!(f.norm() < TOLERANCE);
        }
    }

    #[test]
    fn displaced_shell_feels_axis_spring() {
        // The O->D axis is +y, so a pure y displacement loads only kz.
        let (v, forces) = run(&water_coords(Vector3::new(0.0, 0.01, 0.0)));
        assert!((v - 0.5 * 700.0 * 0.01 * 0.01).abs() < 1e-9);
        // Shell pulled back toward the dummy.
        assert!(forces[4].y < 0.0);
    }

    #[test]
    fn only_shell_and_dummy_receive_force() {
        let (_, forces) = run(&water_coords(Vector3::new(0.004, 0.008, -0.003)));
        assert_eq!(forces[0], Vector3::zeros());
        assert_eq!(forces[1], Vector3::zeros());
        assert_eq!(forces[2], Vector3::zeros());
        assert!(forces[3].norm() > 0.0);
        assert!(forces[4].norm() > 0.0);
        // The pair exchanges equal and opposite force.
        assert!((forces[3] + forces[4]).norm() < TOLERANCE);
    }

    #[test]
    fn off_plane_displacement_loads_the_normal_spring() {
        // The plane normal is ±z for this geometry.
        let (v, _) = run(&water_coords(Vector3::new(0.0, 0.0, 0.01)));
        assert!((v - 0.5 * 500.0 * 0.01 * 0.01).abs() < 1e-9);
    }
}
