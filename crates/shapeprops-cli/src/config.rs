use crate::cli::PipelineArgs;
use crate::error::{CliError, Result};
use serde::Deserialize;
use shapeprops::core::forcefield::minimize::MinimizerSettings;
use shapeprops::core::forcefield::params::ForceFieldParams;
use shapeprops::engine::config as core_config;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialSearchConfig {
    #[serde(rename = "rmsd-cutoff")]
    rmsd_cutoff: Option<f64>,
    #[serde(rename = "max-conformers")]
    max_conformers: Option<usize>,
    #[serde(rename = "energy-cutoff")]
    energy_cutoff: Option<f64>,
    verbose: Option<bool>,
    #[serde(rename = "torsion-increments")]
    torsion_increments: Option<Vec<f64>>,
    minimization: Option<MinimizerSettings>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialEmbeddingConfig {
    seed: Option<u64>,
    jitter: Option<f64>,
    minimization: Option<MinimizerSettings>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialDescriptorConfig {
    #[serde(rename = "heavy-atoms-only")]
    heavy_atoms_only: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialForcefieldConfig {
    path: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialPropertiesConfig {
    search: Option<PartialSearchConfig>,
    embedding: Option<PartialEmbeddingConfig>,
    descriptors: Option<PartialDescriptorConfig>,
    forcefield: Option<PartialForcefieldConfig>,
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

impl PartialPropertiesConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Reads the config file named by `args`, or starts from an empty one.
    pub fn load(args: &PipelineArgs) -> Result<Self> {
        match &args.config {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Resolves the final configuration. Precedence, highest first:
    /// `--set` pairs, dedicated CLI options, the config file, built-in defaults.
    pub fn merge_with_cli(
        mut self,
        args: &PipelineArgs,
        heavy_atoms_only: bool,
    ) -> Result<core_config::PropertiesConfig> {
        self.apply_cli_args(args, heavy_atoms_only);
        self.apply_set_values(&args.set_values)?;

        let search = self.search.take().unwrap_or_default();
        let embedding = self.embedding.take().unwrap_or_default();
        let descriptors = self.descriptors.take().unwrap_or_default();
        let forcefield = self.forcefield.take().unwrap_or_default();

        let mut builder = core_config::PropertiesConfigBuilder::new()
            .verbose(search.verbose.unwrap_or(false))
            .heavy_atoms_only(descriptors.heavy_atoms_only.unwrap_or(false));

        if let Some(v) = search.rmsd_cutoff {
            builder = builder.rmsd_cutoff(v);
        }
        if let Some(v) = search.max_conformers {
            builder = builder.max_conformers(v);
        }
        if let Some(v) = search.energy_cutoff {
            builder = builder.energy_cutoff(v);
        }
        if let Some(v) = search.torsion_increments {
            builder = builder.torsion_increments(v);
        }
        if let Some(v) = search.minimization {
            builder = builder.search_minimization(v);
        }
        if let Some(v) = embedding.seed {
            builder = builder.seed(v);
        }
        if let Some(v) = embedding.jitter {
            builder = builder.jitter(v);
        }
        if let Some(v) = embedding.minimization {
            builder = builder.embedding_minimization(v);
        }

        if let Some(path) = forcefield.path {
            debug!("Loading force field parameters from {:?}", path);
            let params = ForceFieldParams::load(&path).map_err(|e| CliError::FileParsing {
                path: path.clone(),
                source: e.into(),
            })?;
            builder = builder.forcefield(params);
        }

        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    fn apply_cli_args(&mut self, args: &PipelineArgs, heavy_atoms_only: bool) {
        let search = self.search.get_or_insert_with(Default::default);
        if let Some(v) = args.rmsd_cutoff {
            search.rmsd_cutoff = Some(v);
        }
        if let Some(v) = args.max_conformers {
            search.max_conformers = Some(v);
        }
        if let Some(v) = args.energy_cutoff {
            search.energy_cutoff = Some(v);
        }
        if args.show_rotors {
            search.verbose = Some(true);
        }
        if let Some(v) = args.seed {
            self.embedding.get_or_insert_with(Default::default).seed = Some(v);
        }
        if heavy_atoms_only {
            self.descriptors
                .get_or_insert_with(Default::default)
                .heavy_atoms_only = Some(true);
        }
        if let Some(path) = &args.forcefield {
            self.forcefield.get_or_insert_with(Default::default).path = Some(path.clone());
        }
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };

            match key {
                "search.rmsd-cutoff" => {
                    self.search.get_or_insert_with(Default::default).rmsd_cutoff =
                        Some(parse_value(key, value_str, "float")?);
                }
                "search.max-conformers" => {
                    self.search.get_or_insert_with(Default::default).max_conformers =
                        Some(parse_value(key, value_str, "integer")?);
                }
                "search.energy-cutoff" => {
                    self.search.get_or_insert_with(Default::default).energy_cutoff =
                        Some(parse_value(key, value_str, "float")?);
                }
                "search.verbose" => {
                    self.search.get_or_insert_with(Default::default).verbose =
                        Some(parse_value(key, value_str, "boolean")?);
                }
                "embedding.seed" => {
                    self.embedding.get_or_insert_with(Default::default).seed =
                        Some(parse_value(key, value_str, "integer")?);
                }
                "embedding.jitter" => {
                    self.embedding.get_or_insert_with(Default::default).jitter =
                        Some(parse_value(key, value_str, "float")?);
                }
                "descriptors.heavy-atoms-only" => {
                    self.descriptors
                        .get_or_insert_with(Default::default)
                        .heavy_atoms_only = Some(parse_value(key, value_str, "boolean")?);
                }
                "forcefield.path" => {
                    self.forcefield.get_or_insert_with(Default::default).path =
                        Some(PathBuf::from(value_str));
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}
