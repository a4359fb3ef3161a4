use crate::core::geometry::plane::fit_plane;
use crate::core::geometry::point_cloud::PointCloud;
use serde::{Deserialize, Serialize};

/// Largest covariance eigenvalue at or below which the cloud is considered
/// to have no spread at all.
const DEGENERATE_EIGENVALUE: f64 = 1e-12;

/// Ratio of the smallest to the largest principal variance of a point cloud.
///
/// `Value` is 0 for flat or linear clouds and 1 for spherically symmetric
/// ones. Clouds without any extent are reported separately rather than as a
/// number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum Globularity {
    Value(f64),
    /// The cloud has no points.
    NoData,
    /// All points coincide (this includes single-point clouds).
    Degenerate,
}

impl Globularity {
    /// Numeric encoding: the ratio itself, 0 for `NoData`, −1 for `Degenerate`.
    pub fn as_sentinel(&self) -> f64 {
        match self {
            Self::Value(v) => *v,
            Self::NoData => 0.0,
            Self::Degenerate => -1.0,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<Globularity> for f64 {
    fn from(g: Globularity) -> Self {
        g.as_sentinel()
    }
}

/// Globularity λ3/λ1 from the eigenvalues λ1 ≥ λ2 ≥ λ3 of the sample
/// covariance of the cloud.
pub fn globularity(cloud: &PointCloud) -> Globularity {
    let Some(covariance) = cloud.covariance() else {
        return Globularity::NoData;
    };
    let mut eigenvalues: Vec<f64> = covariance
        .symmetric_eigen()
        .eigenvalues
        .iter()
        .copied()
        .collect();
    eigenvalues.sort_by(|a, b| b.total_cmp(a));

    let largest = eigenvalues[0];
    if largest <= DEGENERATE_EIGENVALUE {
        return Globularity::Degenerate;
    }
    let smallest = eigenvalues[2].max(0.0);
    Globularity::Value((smallest / largest).min(1.0))
}

/// Mean absolute distance of the points from their least-squares plane.
///
/// Returns 0 for an empty cloud.
pub fn plane_fit_distance(cloud: &PointCloud) -> f64 {
    let Some(plane) = fit_plane(cloud) else {
        return 0.0;
    };
    let total: f64 = cloud.points().iter().map(|p| plane.distance(p)).sum();
    total / cloud.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::transform::rotation_from_axis_angle;
    use nalgebra::{Point3, Vector3};

    fn cloud(points: &[[f64; 3]]) -> PointCloud {
        PointCloud::new(points.iter().map(|p| Point3::new(p[0], p[1], p[2])).collect()).unwrap()
    }

    fn tetrahedron() -> PointCloud {
        cloud(&[
            [1.0, 1.0, 1.0],
            [1.0, -1.0, -1.0],
            [-1.0, 1.0, -1.0],
            [-1.0, -1.0, 1.0],
        ])
    }

    #[test]
    fn regular_tetrahedron_is_fully_globular() {
        let g = globularity(&tetrahedron()).value().unwrap();
        assert!((g - 1.0).abs() < 1e-9);
    }

    #[test]
    fn planar_cloud_has_zero_globularity_and_distance() {
        let c = cloud(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 2.0, 0.0],
            [3.0, 1.0, 0.0],
            [-1.0, 0.5, 0.0],
        ]);
        let g = globularity(&c).value().unwrap();
        assert!(g.abs() < 1e-12);
        assert!(plane_fit_distance(&c) < 1e-12);
    }

    #[test]
    fn collinear_points_have_zero_globularity() {
        let c = cloud(&[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [2.0, 2.0, 2.0]]);
        assert!(globularity(&c).value().unwrap().abs() < 1e-12);
        assert!(plane_fit_distance(&c) < 1e-12);
    }

    #[test]
    fn coincident_and_single_points_are_degenerate() {
        let repeated = cloud(&[[1.5, -2.0, 0.25]; 5]);
        assert_eq!(globularity(&repeated), Globularity::Degenerate);
        assert_eq!(globularity(&repeated).as_sentinel(), -1.0);
        assert_eq!(plane_fit_distance(&repeated), 0.0);

        let single = cloud(&[[3.0, 3.0, 3.0]]);
        assert_eq!(globularity(&single), Globularity::Degenerate);
    }

    #[test]
    fn empty_cloud_reports_no_data() {
        let empty = cloud(&[]);
        assert_eq!(globularity(&empty), Globularity::NoData);
        assert_eq!(f64::from(globularity(&empty)), 0.0);
        assert_eq!(plane_fit_distance(&empty), 0.0);
    }

    #[test]
    fn puckered_square_distance_equals_pucker_height() {
        let h = 0.3;
        let c = cloud(&[[1.0, 1.0, h], [-1.0, 1.0, -h], [-1.0, -1.0, h], [1.0, -1.0, -h]]);
        assert!((plane_fit_distance(&c) - h).abs() < 1e-9);
        let g = globularity(&c).value().unwrap();
        assert!((g - h * h).abs() < 1e-9);
    }

    #[test]
    fn descriptors_are_invariant_under_rigid_motion() {
        let original = cloud(&[
            [0.0, 0.0, 0.0],
            [1.5, 0.2, -0.3],
            [2.1, 1.4, 0.4],
            [0.7, 2.2, 1.1],
            [-0.8, 1.0, 0.6],
        ]);
        let rotation = rotation_from_axis_angle(&Vector3::new(0.3, -1.0, 0.5), 47.0);
        let moved = PointCloud::new(
            original
                .points()
                .iter()
                .map(|p| rotation * p + Vector3::new(5.0, -3.0, 12.0))
                .collect(),
        )
        .unwrap();

        assert!((plane_fit_distance(&original) - plane_fit_distance(&moved)).abs() < 1e-9);
        let (g1, g2) = (
            globularity(&original).value().unwrap(),
            globularity(&moved).value().unwrap(),
        );
        assert!((g1 - g2).abs() < 1e-9);
        assert!((0.0..=1.0).contains(&g1));
    }

    #[test]
    fn globularity_serializes_as_tagged_value() {
        let json = serde_json::to_string(&Globularity::Value(0.5)).unwrap();
        assert_eq!(json, r#"{"kind":"value","value":0.5}"#);
        let json = serde_json::to_string(&Globularity::Degenerate).unwrap();
        assert_eq!(json, r#"{"kind":"degenerate"}"#);
    }
}
