use crate::cli::PropsArgs;
use crate::config::PartialPropertiesConfig;
use crate::error::{CliError, Result};
use crate::output::{self, Entry};
use shapeprops::engine::config::PropertiesConfig;
use shapeprops::engine::conformers::RotorSearchGenerator;
use shapeprops::engine::embedding::DistanceGeometryEmbedder;
use shapeprops::engine::progress::ProgressReporter;
use shapeprops::workflows::{self, properties::PropertyRecord};
use tracing::info;

pub fn run(args: PropsArgs, show_progress: bool) -> Result<()> {
    let partial_config = PartialPropertiesConfig::load(&args.pipeline)?;
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args.pipeline, args.heavy_atoms_only)?;

    let reporter = super::reporter(show_progress);
    let record = compute_record(&args.smiles, &config, &reporter)?;

    let entry = Entry {
        smiles: &args.smiles,
        record: &record,
    };
    let rendered = output::render(&entry, args.format)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered)?;
            info!("Descriptors written to {:?}", path);
            eprintln!("✓ Descriptors written to: {}", path.display());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

fn compute_record(
    smiles: &str,
    config: &PropertiesConfig,
    reporter: &ProgressReporter,
) -> Result<PropertyRecord> {
    let provider =
        DistanceGeometryEmbedder::new(config.embedding.clone(), config.forcefield.clone());
    let generator = RotorSearchGenerator::new(config.forcefield.clone());

    info!(smiles = %smiles, "Computing descriptors.");
    workflows::properties::run(smiles, &provider, &generator, config, reporter).map_err(
        |source| CliError::Molecule {
            smiles: smiles.to_string(),
            source,
        },
    )
}
