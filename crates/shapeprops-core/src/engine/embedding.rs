use super::config::EmbeddingConfig;
use super::error::EngineError;
use super::provider::{GeometryProvider, StructureBlock};
use crate::core::forcefield::field::{
    ForceField, ideal_angle_cosine, ideal_bond_length, repulsion_onset,
};
use crate::core::forcefield::minimize::minimize;
use crate::core::forcefield::params::ForceFieldParams;
use crate::core::io::smiles::parse_smiles;
use crate::core::models::conformer::Conformer;
use crate::core::models::molecule::Molecule;
use itertools::Itertools;
use nalgebra::{DMatrix, Point3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, instrument};

/// Separation added between disconnected fragments beyond the largest
/// intra-fragment bound (Å).
const FRAGMENT_GAP: f64 = 4.0;
/// Fraction of the triangle upper bound used as the target for pairs
/// without an exact distance.
const UPPER_BOUND_FRACTION: f64 = 0.8;

/// Embeds SMILES into 3D by distance geometry.
///
/// Bonded (1-2) and geminal (1-3) distances are fixed from the ideal bond
/// lengths and angles of the force field. All other pairs get a target between
/// their repulsion onset and the shortest-path upper bound, disconnected
/// fragments are pushed apart, and the resulting matrix is turned into
/// coordinates by classical multidimensional scaling. A seeded jitter breaks
/// symmetric degeneracies before a final force-field minimization.
#[derive(Debug, Clone, Default)]
pub struct DistanceGeometryEmbedder {
    config: EmbeddingConfig,
    params: ForceFieldParams,
}

impl DistanceGeometryEmbedder {
    pub fn new(config: EmbeddingConfig, params: ForceFieldParams) -> Self {
        Self { config, params }
    }

    pub fn config(&self) -> &EmbeddingConfig {
        &self.config
    }

    /// Generates one minimized conformer for a perceived molecule.
    pub fn embed_molecule(&self, molecule: &Molecule) -> Result<Conformer, EngineError> {
        self.config.validate()?;
        if molecule.atom_count() == 0 {
            return Err(EngineError::InvalidStructure(
                "molecule has no atoms".to_string(),
            ));
        }

        let targets = self.target_distances(molecule);
        let mut positions = classical_scaling(&targets);
        self.apply_jitter(&mut positions);

        let force_field = ForceField::new(molecule, &self.params);
        let result = minimize(&force_field, &mut positions, &self.config.minimization);
        debug!(
            atoms = molecule.atom_count(),
            energy = result.energy.total(),
            iterations = result.iterations,
            converged = result.converged,
            "Embedding minimized"
        );

        let conformer = Conformer::new(positions).with_energy(result.energy.total());
        if !conformer.is_finite() || !result.energy.total().is_finite() {
            return Err(EngineError::InvalidStructure(
                "embedding produced non-finite coordinates".to_string(),
            ));
        }
        Ok(conformer)
    }

    /// Exact 1-2 and 1-3 distances; `INFINITY` where unknown.
    fn exact_distances(&self, molecule: &Molecule) -> Vec<Vec<f64>> {
        let n = molecule.atom_count();
        let mut exact = vec![vec![f64::INFINITY; n]; n];
        for (i, row) in exact.iter_mut().enumerate() {
            row[i] = 0.0;
        }

        for (b, bond) in molecule.bonds().iter().enumerate() {
            if let Some(length) = ideal_bond_length(molecule, b, &self.params) {
                exact[bond.atom1][bond.atom2] = length;
                exact[bond.atom2][bond.atom1] = length;
            }
        }

        let atoms = molecule.atoms();
        for center in 0..n {
            // Hypervalent centers are laid out with right angles.
            let cos0 = ideal_angle_cosine(atoms[center].hybridization).unwrap_or(0.0);
            let neighbors: Vec<usize> = molecule.neighbors(center).collect();
            for (a, c) in neighbors.into_iter().tuple_combinations() {
                if molecule.bond_between(a, c).is_some() {
                    continue;
                }
                let (da, dc) = (exact[center][a], exact[center][c]);
                let d = (da * da + dc * dc - 2.0 * da * dc * cos0).max(0.0).sqrt();
                if d < exact[a][c] {
                    exact[a][c] = d;
                    exact[c][a] = d;
                }
            }
        }
        exact
    }

    fn target_distances(&self, molecule: &Molecule) -> DMatrix<f64> {
        let n = molecule.atom_count();
        let exact = self.exact_distances(molecule);

        let mut upper = exact.clone();
        for k in 0..n {
            for i in 0..n {
                let via = upper[i][k];
                if via.is_infinite() {
                    continue;
                }
                for j in 0..n {
                    let candidate = via + upper[k][j];
                    if candidate < upper[i][j] {
                        upper[i][j] = candidate;
                    }
                }
            }
        }

        let largest = upper
            .iter()
            .flatten()
            .copied()
            .filter(|d| d.is_finite())
            .fold(0.0, f64::max);

        let atoms = molecule.atoms();
        DMatrix::from_fn(n, n, |i, j| {
            if i == j {
                0.0
            } else if exact[i][j].is_finite() {
                exact[i][j]
            } else if upper[i][j].is_infinite() {
                largest + FRAGMENT_GAP
            } else {
                let ub = upper[i][j];
                let lb = repulsion_onset(&atoms[i], &atoms[j], &self.params);
                (UPPER_BOUND_FRACTION * ub).max(lb.min(ub))
            }
        })
    }

    fn apply_jitter(&self, positions: &mut [Point3<f64>]) {
        let amplitude = self.config.jitter;
        if amplitude <= 0.0 {
            return;
        }
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        for p in positions.iter_mut() {
            for c in p.coords.iter_mut() {
                *c += rng.gen_range(-amplitude..=amplitude);
            }
        }
    }
}

/// Coordinates whose pairwise distances best reproduce `distances`, from the
/// three largest eigenpairs of the double-centered squared distance matrix.
fn classical_scaling(distances: &DMatrix<f64>) -> Vec<Point3<f64>> {
    let n = distances.nrows();
    let squared = distances.map(|d| d * d);
    let row_means: Vec<f64> = (0..n).map(|i| squared.row(i).mean()).collect();
    let grand_mean = squared.mean();
    let gram = DMatrix::from_fn(n, n, |i, j| {
        -0.5 * (squared[(i, j)] - row_means[i] - row_means[j] + grand_mean)
    });

    let eigen = gram.symmetric_eigen();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| eigen.eigenvalues[b].total_cmp(&eigen.eigenvalues[a]));

    let mut positions = vec![Point3::origin(); n];
    for (axis, &k) in order.iter().take(3).enumerate() {
        let scale = eigen.eigenvalues[k].max(0.0).sqrt();
        for (i, p) in positions.iter_mut().enumerate() {
            p[axis] = eigen.eigenvectors[(i, k)] * scale;
        }
    }
    positions
}

impl GeometryProvider for DistanceGeometryEmbedder {
    #[instrument(skip_all, name = "distance_geometry_embedding", fields(smiles = %smiles))]
    fn embed(&self, smiles: &str) -> Result<StructureBlock, EngineError> {
        let mut molecule = parse_smiles(smiles)?;
        let conformer = self.embed_molecule(&molecule)?;
        molecule
            .add_conformer(conformer)
            .map_err(|e| EngineError::InvalidStructure(e.to_string()))?;
        Ok(StructureBlock::from_molecule(&molecule)?)
    }
}
