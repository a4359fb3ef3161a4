use crate::core::models::molecule::Molecule;
use nalgebra::{Matrix3, Point3, Vector3};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    #[error("Coordinate of point {index} is not finite")]
    NonFinite { index: usize },
    #[error("Conformer {0} does not exist")]
    MissingConformer(usize),
}

/// An immutable n×3 snapshot of atomic coordinates.
///
/// Every coordinate is guaranteed to be finite. Point clouds are detached from
/// the molecule they were taken from, so they can be shared across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    points: Vec<Point3<f64>>,
}

impl PointCloud {
    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] for the first point with a NaN or
    /// infinite coordinate.
    pub fn new(points: Vec<Point3<f64>>) -> Result<Self, GeometryError> {
        if let Some(index) = points
            .iter()
            .position(|p| !p.coords.iter().all(|c| c.is_finite()))
        {
            return Err(GeometryError::NonFinite { index });
        }
        Ok(Self { points })
    }

    /// Snapshots a conformer of `molecule`, optionally keeping heavy atoms only.
    pub fn from_conformer(
        molecule: &Molecule,
        conformer_index: usize,
        heavy_atoms_only: bool,
    ) -> Result<Self, GeometryError> {
        let conformer = molecule
            .conformer(conformer_index)
            .ok_or(GeometryError::MissingConformer(conformer_index))?;
        let points = conformer
            .positions()
            .iter()
            .zip(molecule.atoms())
            .filter(|(_, atom)| !heavy_atoms_only || atom.is_heavy())
            .map(|(p, _)| *p)
            .collect();
        Self::new(points)
    }

    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Arithmetic mean of the points; `None` for an empty cloud.
    pub fn centroid(&self) -> Option<Point3<f64>> {
        if self.points.is_empty() {
            return None;
        }
        let sum: Vector3<f64> = self.points.iter().map(|p| p.coords).sum();
        Some(Point3::from(sum / self.points.len() as f64))
    }

    /// Sample covariance of the x, y and z columns (n − 1 denominator).
    ///
    /// A single point has zero spread. `None` for an empty cloud.
    pub fn covariance(&self) -> Option<Matrix3<f64>> {
        let centroid = self.centroid()?;
        let n = self.points.len();
        if n < 2 {
            return Some(Matrix3::zeros());
        }
        let scatter = self.points.iter().fold(Matrix3::zeros(), |acc, p| {
            let d = p - centroid;
            acc + d * d.transpose()
        });
        Some(scatter / (n - 1) as f64)
    }
}
