use nalgebra::{Point3, Rotation3, Unit, Vector3};

pub fn rotation_from_axis_angle(axis: &Vector3<f64>, angle_degrees: f64) -> Rotation3<f64> {
    Rotation3::from_axis_angle(&Unit::new_normalize(*axis), angle_degrees.to_radians())
}

/// Rotates the selected atoms about the axis running from `pivot` towards
/// `axis_end`. Atoms outside `atoms` are left in place.
pub fn rotate_about_bond(
    positions: &mut [Point3<f64>],
    pivot: &Point3<f64>,
    axis_end: &Point3<f64>,
    angle_degrees: f64,
    atoms: &[usize],
) {
    let axis = axis_end - pivot;
    if axis.norm_squared() == 0.0 {
        return;
    }
    let rotation = rotation_from_axis_angle(&axis, angle_degrees);
    for &index in atoms {
        if let Some(p) = positions.get_mut(index) {
            *p = pivot + rotation * (*p - pivot);
        }
    }
}

/// Dihedral angle p0-p1-p2-p3 in degrees, in (-180, 180].
pub fn dihedral_angle(
    p0: &Point3<f64>,
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    p3: &Point3<f64>,
) -> f64 {
    let b0 = p0 - p1;
    let b1 = p2 - p1;
    let b2 = p3 - p2;
    let b1n = b1.normalize();
    let v = b0 - b1n * b0.dot(&b1n);
    let w = b2 - b1n * b2.dot(&b1n);
    let x = v.dot(&w);
    let y = b1n.cross(&v).dot(&w);
    y.atan2(x).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_turn_about_z() {
        let rot = rotation_from_axis_angle(&Vector3::new(0.0, 0.0, 2.0), 90.0);
        let p = rot * Point3::new(1.0, 0.0, 0.0);
        assert!((p - Point3::new(0.0, 1.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn rotating_one_side_changes_the_dihedral() {
        let mut positions = vec![
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 1.5),
            Point3::new(1.0, 1.0, 1.5),
        ];
        let before = dihedral_angle(&positions[0], &positions[1], &positions[2], &positions[3]);
        assert!(before.abs() < 1e-9);

        let (pivot, end) = (positions[1], positions[2]);
        rotate_about_bond(&mut positions, &pivot, &end, 120.0, &[3]);
        let after = dihedral_angle(&positions[0], &positions[1], &positions[2], &positions[3]);
        assert!((after.abs() - 120.0).abs() < 1e-9);
        assert_eq!(positions[0], Point3::new(1.0, 1.0, 0.0));
        assert!((positions[3].z - 1.5).abs() < 1e-12);
    }

    #[test]
    fn degenerate_axis_leaves_positions_untouched() {
        let mut positions = vec![Point3::new(1.0, 2.0, 3.0)];
        let pivot = Point3::origin();
        rotate_about_bond(&mut positions, &pivot, &pivot, 90.0, &[0]);
        assert_eq!(positions[0], Point3::new(1.0, 2.0, 3.0));
    }
}
