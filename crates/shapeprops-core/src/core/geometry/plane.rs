use super::point_cloud::PointCloud;
use nalgebra::{DMatrix, Point3, Unit, Vector3};

/// Least-squares plane through a point cloud.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneFit {
    pub centroid: Point3<f64>,
    pub normal: Unit<Vector3<f64>>,
}

impl PlaneFit {
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        (point - self.centroid).dot(&self.normal)
    }

    pub fn distance(&self, point: &Point3<f64>) -> f64 {
        self.signed_distance(point).abs()
    }
}

/// Fits the plane minimizing the summed squared orthogonal distances.
///
/// The normal is the right singular vector belonging to the smallest singular
/// value of the centered coordinates. Clouds with fewer than three points are
/// zero-padded to three rows, which leaves the right singular vectors
/// unchanged. For coincident points any unit vector is a valid normal.
///
/// Returns `None` only for an empty cloud.
pub fn fit_plane(cloud: &PointCloud) -> Option<PlaneFit> {
    let centroid = cloud.centroid()?;
    let rows = cloud.len().max(3);
    let mut centered = DMatrix::<f64>::zeros(rows, 3);
    for (i, p) in cloud.points().iter().enumerate() {
        let d = p - centroid;
        centered[(i, 0)] = d.x;
        centered[(i, 1)] = d.y;
        centered[(i, 2)] = d.z;
    }

    let svd = centered.svd(false, true);
    let v_t = svd.v_t?;
    let smallest = svd.singular_values.argmin().0;
    let row = v_t.row(smallest);
    let candidate = Vector3::new(row[0], row[1], row[2]);

    let normal = Unit::try_new(candidate, 1e-12)
        .filter(|n| n.iter().all(|c| c.is_finite()))
        .unwrap_or_else(Vector3::z_axis);
    Some(PlaneFit { centroid, normal })
}
