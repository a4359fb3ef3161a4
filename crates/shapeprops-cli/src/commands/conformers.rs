use crate::cli::ConformersArgs;
use crate::config::PartialPropertiesConfig;
use crate::error::{CliError, Result};
use shapeprops::core::io::sdf::SdfFile;
use shapeprops::core::io::traits::MolecularFile;
use shapeprops::engine::conformers::RotorSearchGenerator;
use shapeprops::engine::embedding::DistanceGeometryEmbedder;
use shapeprops::engine::error::EngineError;
use shapeprops::engine::progress::Progress;
use shapeprops::engine::provider::{ConformerGenerator, GeometryProvider};
use tracing::info;

pub fn run(args: ConformersArgs, show_progress: bool) -> Result<()> {
    let partial_config = PartialPropertiesConfig::load(&args.pipeline)?;
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args.pipeline, false)?;

    let provider =
        DistanceGeometryEmbedder::new(config.embedding.clone(), config.forcefield.clone());
    let generator = RotorSearchGenerator::new(config.forcefield.clone());
    let reporter = super::reporter(show_progress);
    let with_smiles = |source: EngineError| CliError::Molecule {
        smiles: args.smiles.clone(),
        source,
    };

    reporter.report(Progress::PhaseStart { name: "Embedding" });
    let structure = provider.embed(&args.smiles).map_err(with_smiles)?;
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart {
        name: "Conformer Search",
    });
    let ensemble = generator
        .generate(&structure, &config.search, &reporter)
        .map_err(with_smiles)?;
    reporter.report(Progress::PhaseFinish);

    if ensemble.conformer_count() == 0 {
        return Err(with_smiles(EngineError::EmptyEnsemble));
    }

    info!(
        "Writing {} conformer(s) to {:?}",
        ensemble.conformer_count(),
        &args.output
    );
    SdfFile::write_molecule_to_path(&ensemble, &args.output).map_err(|e| {
        CliError::FileParsing {
            path: args.output.clone(),
            source: e.into(),
        }
    })?;

    let lowest = ensemble
        .conformer(0)
        .and_then(|c| c.energy())
        .unwrap_or(f64::NAN);
    eprintln!(
        "✓ {} conformer(s) (lowest energy: {:.4} kcal/mol) written to: {}",
        ensemble.conformer_count(),
        lowest,
        args.output.display()
    );
    Ok(())
}
