use crate::core::descriptors::composition::{molecular_formula, molecular_weight};
use crate::core::descriptors::shape::{globularity, plane_fit_distance};
use crate::core::descriptors::topology::rotatable_bond_count;
use crate::core::geometry::point_cloud::PointCloud;
use crate::engine::config::PropertiesConfig;
use crate::engine::conformers::RotorSearchGenerator;
use crate::engine::embedding::DistanceGeometryEmbedder;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::provider::{ConformerGenerator, GeometryProvider};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Descriptors of one molecule.
///
/// `glob` and `pbf` are means over the conformer ensemble; `glob` averages the
/// sentinel encoding, so degenerate conformers contribute −1 and empty ones 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    /// Molecular formula in Hill order with the net charge appended.
    pub form: String,
    /// Molecular weight (g/mol).
    pub molwt: f64,
    /// Number of rotatable bonds.
    pub rb: u32,
    /// Mean globularity.
    pub glob: f64,
    /// Mean plane-of-best-fit distance (Å).
    pub pbf: f64,
}

/// Computes the descriptors of `smiles` with the default collaborators and
/// configuration.
pub fn average_properties(smiles: &str) -> Result<PropertyRecord, EngineError> {
    let config = PropertiesConfig::default();
    let provider =
        DistanceGeometryEmbedder::new(config.embedding.clone(), config.forcefield.clone());
    let generator = RotorSearchGenerator::new(config.forcefield.clone());
    run(
        smiles,
        &provider,
        &generator,
        &config,
        &ProgressReporter::new(),
    )
}

#[instrument(skip_all, name = "properties_workflow", fields(smiles = %smiles))]
pub fn run(
    smiles: &str,
    provider: &dyn GeometryProvider,
    generator: &dyn ConformerGenerator,
    config: &PropertiesConfig,
    reporter: &ProgressReporter,
) -> Result<PropertyRecord, EngineError> {
    config.validate()?;

    // === Phase 1: Initial 3D structure ===
    reporter.report(Progress::PhaseStart { name: "Embedding" });
    info!("Embedding initial structure.");
    let structure = provider.embed(smiles)?;
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Conformer ensemble ===
    reporter.report(Progress::PhaseStart {
        name: "Conformer Search",
    });
    let ensemble = generator.generate(&structure, &config.search, reporter)?;
    reporter.report(Progress::PhaseFinish);

    let conformer_count = ensemble.conformer_count();
    if conformer_count == 0 {
        return Err(EngineError::EmptyEnsemble);
    }
    info!(conformers = conformer_count, "Conformer ensemble ready.");
    reporter.report(Progress::Message(format!(
        "{conformer_count} conformer(s) generated"
    )));

    // === Phase 3: Descriptors ===
    reporter.report(Progress::PhaseStart {
        name: "Descriptors",
    });
    let form = molecular_formula(&ensemble);
    let molwt = molecular_weight(&ensemble);
    let rb = rotatable_bond_count(&ensemble);

    let clouds = (0..conformer_count)
        .map(|i| {
            PointCloud::from_conformer(&ensemble, i, config.heavy_atoms_only)
                .map_err(|source| EngineError::NonFiniteCoordinates { conformer: i, source })
        })
        .collect::<Result<Vec<_>, _>>()?;

    #[cfg(not(feature = "parallel"))]
    let iterator = clouds.iter();

    #[cfg(feature = "parallel")]
    let iterator = clouds.par_iter();

    let values: Vec<(f64, f64)> = iterator
        .map(|cloud| (globularity(cloud).as_sentinel(), plane_fit_distance(cloud)))
        .collect();

    let n = conformer_count as f64;
    let glob = values.iter().map(|(g, _)| g).sum::<f64>() / n;
    let pbf = values.iter().map(|(_, p)| p).sum::<f64>() / n;
    reporter.report(Progress::PhaseFinish);

    debug!(%form, molwt, rb, glob, pbf, "Descriptors averaged.");
    Ok(PropertyRecord {
        form,
        molwt,
        rb,
        glob,
        pbf,
    })
}
