use super::config::ConformerSearchConfig;
use super::error::EngineError;
use super::progress::{Progress, ProgressReporter};
use super::provider::{ConformerGenerator, StructureBlock};
use crate::core::descriptors::topology::rotatable_bonds;
use crate::core::forcefield::field::ForceField;
use crate::core::forcefield::minimize::minimize;
use crate::core::forcefield::params::ForceFieldParams;
use crate::core::geometry::superpose::superposed_rmsd;
use crate::core::geometry::transform::rotate_about_bond;
use crate::core::models::conformer::Conformer;
use crate::core::models::molecule::Molecule;
use nalgebra::Point3;
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A rotatable bond together with the atoms that move when it is twisted.
#[derive(Debug, Clone)]
struct Rotor {
    bond: usize,
    pivot: usize,
    axis_end: usize,
    moving: Vec<usize>,
}

/// Rotors of a molecule, each moving the smaller side of its bond.
fn find_rotors(molecule: &Molecule) -> Vec<Rotor> {
    let n = molecule.atom_count();
    rotatable_bonds(molecule)
        .into_iter()
        .filter_map(|b| {
            let bond = molecule.bond(b)?;
            let far_side = molecule.bond_side(b)?;
            if far_side.len() * 2 <= n {
                Some(Rotor {
                    bond: b,
                    pivot: bond.atom1,
                    axis_end: bond.atom2,
                    moving: far_side,
                })
            } else {
                let mut on_far_side = vec![false; n];
                for &i in &far_side {
                    on_far_side[i] = true;
                }
                Some(Rotor {
                    bond: b,
                    pivot: bond.atom2,
                    axis_end: bond.atom1,
                    moving: (0..n).filter(|&i| !on_far_side[i]).collect(),
                })
            }
        })
        .collect()
}

/// Number of torsion combinations, capped at `cap`.
fn trial_count(rotors: usize, increments: usize, cap: usize) -> usize {
    u32::try_from(rotors)
        .ok()
        .and_then(|k| increments.checked_pow(k))
        .map_or(cap, |total| total.min(cap))
}

/// Applies the torsion combination with mixed-radix index `trial` to `start`.
fn build_trial(
    start: &[Point3<f64>],
    rotors: &[Rotor],
    increments: &[f64],
    mut trial: usize,
) -> Vec<Point3<f64>> {
    let mut positions = start.to_vec();
    for rotor in rotors {
        let angle = increments[trial % increments.len()];
        trial /= increments.len();
        if angle == 0.0 {
            continue;
        }
        let pivot = positions[rotor.pivot];
        let axis_end = positions[rotor.axis_end];
        rotate_about_bond(&mut positions, &pivot, &axis_end, angle, &rotor.moving);
    }
    positions
}

/// Energy-window and RMSD pruning of minimized trials.
///
/// Candidates are visited in order of increasing energy; each one is kept if
/// it lies within the window and its RMSD over `atoms` to every conformer kept
/// so far exceeds the cutoff. The lowest-energy candidate is always kept.
fn select_ensemble(
    mut candidates: Vec<Conformer>,
    atoms: &[usize],
    config: &ConformerSearchConfig,
) -> Vec<Conformer> {
    let energy_of = |c: &Conformer| c.energy().unwrap_or(f64::INFINITY);
    candidates.sort_by(|a, b| energy_of(a).total_cmp(&energy_of(b)));
    let Some(lowest) = candidates.first().map(energy_of) else {
        return Vec::new();
    };

    let mut kept: Vec<Conformer> = Vec::new();
    let mut kept_coords: Vec<Vec<Point3<f64>>> = Vec::new();
    for candidate in candidates {
        if energy_of(&candidate) - lowest > config.energy_cutoff {
            break;
        }
        let coords: Vec<Point3<f64>> = atoms.iter().map(|&i| candidate.positions()[i]).collect();
        let distinct = kept_coords.iter().all(|other| {
            superposed_rmsd(&coords, other).is_none_or(|rmsd| rmsd > config.rmsd_cutoff)
        });
        if distinct {
            kept_coords.push(coords);
            kept.push(candidate);
        }
    }
    kept
}

/// Systematic torsion scan over rotatable bonds.
///
/// Every combination of the configured torsion increments (up to
/// `max_conformers` of them) is applied to the minimized input geometry and
/// minimized again. Survivors of the energy window and heavy-atom RMSD
/// pruning form the ensemble, lowest energy first, with their force-field
/// energies attached.
#[derive(Debug, Clone, Default)]
pub struct RotorSearchGenerator {
    params: ForceFieldParams,
}

impl RotorSearchGenerator {
    pub fn new(params: ForceFieldParams) -> Self {
        Self { params }
    }
}

impl ConformerGenerator for RotorSearchGenerator {
    #[instrument(skip_all, name = "rotor_search")]
    fn generate(
        &self,
        structure: &StructureBlock,
        config: &ConformerSearchConfig,
        reporter: &ProgressReporter,
    ) -> Result<Molecule, EngineError> {
        config.validate()?;
        let mut molecule = structure.to_molecule()?;
        let Some(input) = molecule.take_conformers().into_iter().next() else {
            return Err(EngineError::InvalidStructure(
                "structure has no coordinates".to_string(),
            ));
        };
        if molecule.atom_count() == 0 {
            return Ok(molecule);
        }

        let force_field = ForceField::new(&molecule, &self.params);
        let mut start = input.into_positions();
        let relaxed = minimize(&force_field, &mut start, &config.minimization);
        debug!(
            energy = relaxed.energy.total(),
            iterations = relaxed.iterations,
            "Input geometry relaxed"
        );

        let rotors = find_rotors(&molecule);
        if config.verbose {
            for rotor in &rotors {
                let bond = &molecule.bonds()[rotor.bond];
                info!(
                    bond = rotor.bond,
                    atom1 = bond.atom1,
                    atom2 = bond.atom2,
                    moving_atoms = rotor.moving.len(),
                    "Rotatable bond"
                );
            }
        }

        let increments = &config.torsion_increments;
        let total = trial_count(rotors.len(), increments.len(), config.max_conformers);
        info!(
            rotors = rotors.len(),
            trials = total,
            "Starting torsion scan"
        );
        reporter.report(Progress::TaskStart {
            total_steps: total as u64,
        });

        let evaluate = |trial: usize| -> Option<Conformer> {
            let mut positions = build_trial(&start, &rotors, increments, trial);
            let result = minimize(&force_field, &mut positions, &config.minimization);
            reporter.report(Progress::TaskIncrement);
            let energy = result.energy.total();
            let conformer = Conformer::new(positions).with_energy(energy);
            (energy.is_finite() && conformer.is_finite()).then_some(conformer)
        };

        #[cfg(not(feature = "parallel"))]
        let iterator = 0..total;

        #[cfg(feature = "parallel")]
        let iterator = (0..total).into_par_iter();

        let candidates: Vec<Conformer> = iterator.filter_map(evaluate).collect();
        reporter.report(Progress::TaskFinish);

        let candidate_count = candidates.len();
        let mut atoms = molecule.heavy_atom_indices();
        if atoms.is_empty() {
            atoms = (0..molecule.atom_count()).collect();
        }
        let ensemble = select_ensemble(candidates, &atoms, config);

        if config.verbose {
            info!(
                candidates = candidate_count,
                kept = ensemble.len(),
                "Conformer search finished"
            );
        } else {
            debug!(
                candidates = candidate_count,
                kept = ensemble.len(),
                "Conformer search finished"
            );
        }

        molecule
            .set_conformers(ensemble)
            .map_err(|e| EngineError::InvalidStructure(e.to_string()))?;
        Ok(molecule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::transform::dihedral_angle;
    use crate::core::io::smiles::parse_smiles;
    use crate::engine::embedding::DistanceGeometryEmbedder;
    use crate::engine::provider::GeometryProvider;
    use std::sync::Mutex;

    fn structure(smiles: &str) -> StructureBlock {
        DistanceGeometryEmbedder::default().embed(smiles).unwrap()
    }

    fn search(smiles: &str, config: &ConformerSearchConfig) -> Molecule {
        RotorSearchGenerator::default()
            .generate(&structure(smiles), config, &ProgressReporter::new())
            .unwrap()
    }

    #[test]
    fn rotors_move_the_smaller_side() {
        let molecule = parse_smiles("CCCCC(C)(C)C").unwrap();
        let rotors = find_rotors(&molecule);
        assert!(!rotors.is_empty());
        for rotor in &rotors {
            assert!(rotor.moving.len() * 2 <= molecule.atom_count());
            assert!(rotor.moving.contains(&rotor.axis_end));
            assert!(!rotor.moving.contains(&rotor.pivot));
        }
    }

    #[test]
    fn trial_count_is_capped() {
        assert_eq!(trial_count(0, 3, 100), 1);
        assert_eq!(trial_count(2, 3, 100), 9);
        assert_eq!(trial_count(5, 3, 100), 100);
        assert_eq!(trial_count(200, 3, 100_000), 100_000);
    }

    #[test]
    fn trial_zero_is_the_start_geometry() {
        let block = structure("CCCC");
        let molecule = block.to_molecule().unwrap();
        let start = molecule.conformer(0).unwrap().positions().to_vec();
        let rotors = find_rotors(&molecule);
        assert_eq!(rotors.len(), 1);

        assert_eq!(build_trial(&start, &rotors, &[0.0, 120.0], 0), start);

        let twisted = build_trial(&start, &rotors, &[0.0, 120.0], 1);
        let carbons: Vec<usize> = molecule.heavy_atom_indices();
        let before = dihedral_angle(
            &start[carbons[0]],
            &start[carbons[1]],
            &start[carbons[2]],
            &start[carbons[3]],
        );
        let after = dihedral_angle(
            &twisted[carbons[0]],
            &twisted[carbons[1]],
            &twisted[carbons[2]],
            &twisted[carbons[3]],
        );
        let change = (after - before).rem_euclid(360.0);
        let change = change.min(360.0 - change);
        assert!((change - 120.0).abs() < 1e-6, "dihedral changed by {change}");
    }

    #[test]
    fn rigid_molecule_yields_one_conformer() {
        let molecule = search("c1ccccc1", &ConformerSearchConfig::default());
        assert_eq!(molecule.conformer_count(), 1);
        assert_eq!(molecule.atom_count(), 12);
    }

    #[test]
    fn ensemble_is_sorted_by_energy_within_the_window() {
        let config = ConformerSearchConfig::default();
        let molecule = search("CCCCC", &config);
        let energies: Vec<f64> = molecule
            .conformers()
            .iter()
            .map(|c| c.energy().unwrap())
            .collect();
        assert!(!energies.is_empty());
        assert!(energies.len() <= 9);
        assert!(energies.windows(2).all(|w| w[0] <= w[1]));
        assert!(energies.iter().all(|e| e - energies[0] <= config.energy_cutoff));
    }

    #[test]
    fn max_conformers_caps_the_ensemble() {
        let config = ConformerSearchConfig {
            max_conformers: 2,
            ..ConformerSearchConfig::default()
        };
        let molecule = search("CCCCCC", &config);
        assert!((1..=2).contains(&molecule.conformer_count()));
    }

    #[test]
    fn large_rmsd_cutoff_keeps_only_the_lowest() {
        let config = ConformerSearchConfig {
            rmsd_cutoff: 100.0,
            ..ConformerSearchConfig::default()
        };
        let molecule = search("CCCCC", &config);
        assert_eq!(molecule.conformer_count(), 1);
    }

    #[test]
    fn progress_counts_every_trial() {
        let increments = Mutex::new(0u64);
        let total = Mutex::new(0u64);
        let reporter = ProgressReporter::with_callback(Box::new(|event| match event {
            Progress::TaskStart { total_steps } => *total.lock().unwrap() = total_steps,
            Progress::TaskIncrement => *increments.lock().unwrap() += 1,
            _ => {}
        }));
        RotorSearchGenerator::default()
            .generate(
                &structure("CCCC"),
                &ConformerSearchConfig::default(),
                &reporter,
            )
            .unwrap();
        drop(reporter);
        assert_eq!(total.into_inner().unwrap(), 3);
        assert_eq!(increments.into_inner().unwrap(), 3);
    }

    #[test]
    fn selection_prunes_by_window_and_similarity() {
        let base = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.5, 0.0, 0.0),
            Point3::new(2.0, 1.4, 0.0),
        ];
        let far = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.5, 0.0, 0.0),
            Point3::new(6.0, 0.0, 0.0),
        ];
        let candidates = vec![
            Conformer::new(far.clone()).with_energy(3.0),
            Conformer::new(base.clone()).with_energy(1.0),
            Conformer::new(base.clone()).with_energy(2.0),
            Conformer::new(far).with_energy(80.0),
        ];
        let config = ConformerSearchConfig::default();
        let kept = select_ensemble(candidates, &[0, 1, 2], &config);
        let energies: Vec<f64> = kept.iter().map(|c| c.energy().unwrap()).collect();
        assert_eq!(energies, vec![1.0, 3.0]);
    }

    #[test]
    fn malformed_block_is_an_invalid_structure() {
        let err = RotorSearchGenerator::default()
            .generate(
                &StructureBlock::new("not a mol block"),
                &ConformerSearchConfig::default(),
                &ProgressReporter::new(),
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidStructure(_)));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = ConformerSearchConfig {
            torsion_increments: Vec::new(),
            ..ConformerSearchConfig::default()
        };
        let err = RotorSearchGenerator::default()
            .generate(&structure("CC"), &config, &ProgressReporter::new())
            .unwrap_err();
        assert!(matches!(err, EngineError::Config { .. }));
    }
}
