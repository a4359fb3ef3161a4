use nalgebra::Point3;

/// One 3D arrangement of a molecule: a position for every atom, in atom order.
///
/// A conformer optionally carries the force-field energy (kcal/mol) it was
/// accepted at by the conformer search.
#[derive(Debug, Clone, PartialEq)]
pub struct Conformer {
    positions: Vec<Point3<f64>>,
    energy: Option<f64>,
}

impl Conformer {
    pub fn new(positions: Vec<Point3<f64>>) -> Self {
        Self {
            positions,
            energy: None,
        }
    }

    pub fn with_energy(mut self, energy: f64) -> Self {
        self.energy = Some(energy);
        self
    }

    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    pub fn positions_mut(&mut self) -> &mut [Point3<f64>] {
        &mut self.positions
    }

    pub fn into_positions(self) -> Vec<Point3<f64>> {
        self.positions
    }

    pub fn position(&self, atom: usize) -> Option<&Point3<f64>> {
        self.positions.get(atom)
    }

    pub fn energy(&self) -> Option<f64> {
        self.energy
    }

    pub fn set_energy(&mut self, energy: Option<f64>) {
        self.energy = energy;
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Whether every coordinate of every position is finite.
    pub fn is_finite(&self) -> bool {
        self.positions
            .iter()
            .all(|p| p.coords.iter().all(|c| c.is_finite()))
    }
}
