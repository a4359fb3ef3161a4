use nalgebra::{Matrix3, Point3, Rotation3, Vector3};

/// Root-mean-square deviation between two equally sized coordinate sets,
/// without any superposition.
pub fn calculate_rmsd(coords1: &[Point3<f64>], coords2: &[Point3<f64>]) -> Option<f64> {
    if coords1.len() != coords2.len() || coords1.is_empty() {
        return None;
    }
    let n = coords1.len() as f64;
    let squared_dist_sum: f64 = coords1
        .iter()
        .zip(coords2.iter())
        .map(|(p1, p2)| (p1 - p2).norm_squared())
        .sum();
    Some((squared_dist_sum / n).sqrt())
}

fn centroid(points: &[Point3<f64>]) -> Point3<f64> {
    let sum: Vector3<f64> = points.iter().map(|p| p.coords).sum();
    Point3::from(sum / points.len() as f64)
}

/// Proper rotation and translation mapping `from_points` onto `to_points` in
/// the least-squares sense (Kabsch algorithm).
pub fn kabsch_transformation(
    from_points: &[Point3<f64>],
    to_points: &[Point3<f64>],
) -> Option<(Rotation3<f64>, Vector3<f64>)> {
    if from_points.len() != to_points.len() || from_points.is_empty() {
        return None;
    }
    let from_centroid = centroid(from_points);
    let to_centroid = centroid(to_points);

    let h = from_points
        .iter()
        .zip(to_points.iter())
        .fold(Matrix3::zeros(), |acc, (f, t)| {
            acc + (t - to_centroid) * (f - from_centroid).transpose()
        });

    let svd = h.svd(true, true);
    let u = svd.u?;
    let v_t = svd.v_t?;

    let d = (u * v_t).determinant();
    let mut correction = Matrix3::identity();
    if d < 0.0 {
        correction[(2, 2)] = -1.0;
    }

    let rotation = Rotation3::from_matrix_unchecked(u * correction * v_t);
    let translation = to_centroid.coords - rotation * from_centroid.coords;
    Some((rotation, translation))
}

/// RMSD after optimally superimposing `coords1` onto `coords2`.
pub fn superposed_rmsd(coords1: &[Point3<f64>], coords2: &[Point3<f64>]) -> Option<f64> {
    let (rotation, translation) = kabsch_transformation(coords1, coords2)?;
    let moved: Vec<Point3<f64>> = coords1
        .iter()
        .map(|p| rotation * p + translation)
        .collect();
    calculate_rmsd(&moved, coords2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::transform::rotation_from_axis_angle;

    fn sample() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.5, 0.0, 0.0),
            Point3::new(2.0, 1.4, 0.0),
            Point3::new(3.5, 1.4, 0.3),
            Point3::new(4.0, 2.8, -0.9),
        ]
    }

    #[test]
    fn rmsd_requires_matching_non_empty_sets() {
        assert_eq!(calculate_rmsd(&[], &[]), None);
        assert_eq!(calculate_rmsd(&sample(), &sample()[..2]), None);
        assert_eq!(calculate_rmsd(&sample(), &sample()), Some(0.0));
    }

    #[test]
    fn pure_translation_is_recovered() {
        let from = sample();
        let offset = Vector3::new(10.0, 20.0, 30.0);
        let to: Vec<_> = from.iter().map(|p| p + offset).collect();
        let (rot, trans) = kabsch_transformation(&from, &to).unwrap();
        assert!(rot.angle().abs() < 1e-9);
        assert!((trans - offset).norm() < 1e-9);
    }

    #[test]
    fn superposed_rmsd_ignores_rigid_motion() {
        let from = sample();
        let rot = rotation_from_axis_angle(&Vector3::new(1.0, 2.0, -0.5), 73.0);
        let to: Vec<_> = from
            .iter()
            .map(|p| rot * p + Vector3::new(-3.0, 0.5, 7.0))
            .collect();
        assert!(calculate_rmsd(&from, &to).unwrap() > 1.0);
        assert!(superposed_rmsd(&from, &to).unwrap() < 1e-9);
    }

    #[test]
    fn mirror_images_are_not_superimposed_by_reflection() {
        let from = sample();
        let mirrored: Vec<_> = from.iter().map(|p| Point3::new(p.x, p.y, -p.z)).collect();
        let (rotation, _) = kabsch_transformation(&from, &mirrored).unwrap();
        assert!((rotation.matrix().determinant() - 1.0).abs() < 1e-9);
        assert!(superposed_rmsd(&from, &mirrored).unwrap() > 1e-3);
    }
}
