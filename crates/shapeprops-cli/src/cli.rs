use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "The shapeprops developers",
    version,
    about = "shapeprops - conformer-averaged globularity, plane-of-best-fit distance and rotatable-bond counts for small molecules given as SMILES.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the conformer-averaged descriptors of a molecule.
    Props(PropsArgs),
    /// Generate the conformer ensemble of a molecule and write it as an SD file.
    Conformers(ConformersArgs),
}

/// Output formats of the `props` subcommand.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Toml,
}

/// Options shared by every subcommand that runs the descriptor pipeline.
#[derive(Args, Debug, Clone, Default)]
pub struct PipelineArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Search Overrides ---
    /// Override the RMSD (Angstrom) above which two conformers count as distinct.
    #[arg(long, value_name = "FLOAT")]
    pub rmsd_cutoff: Option<f64>,

    /// Override the maximum number of torsion trials (and conformers).
    #[arg(long, value_name = "INT")]
    pub max_conformers: Option<usize>,

    /// Override the energy window (kcal/mol) above the lowest conformer.
    #[arg(long, value_name = "FLOAT")]
    pub energy_cutoff: Option<f64>,

    /// Log the rotatable bonds and search statistics.
    #[arg(long)]
    pub show_rotors: bool,

    // --- Embedding Overrides ---
    /// Override the random seed of the initial embedding.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Override the force field parameter file.
    #[arg(long, value_name = "PATH")]
    pub forcefield: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S search.rmsd-cutoff=1.0
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `props` subcommand.
#[derive(Args, Debug)]
pub struct PropsArgs {
    /// SMILES string of the molecule to describe.
    #[arg(required = true, value_name = "SMILES")]
    pub smiles: String,

    /// Output format of the descriptor record.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write the record to a file instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Evaluate shape descriptors on heavy atoms only.
    #[arg(long)]
    pub heavy_atoms_only: bool,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

/// Arguments for the `conformers` subcommand.
#[derive(Args, Debug)]
pub struct ConformersArgs {
    /// SMILES string of the molecule.
    #[arg(required = true, value_name = "SMILES")]
    pub smiles: String,

    /// Path for the output SD file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}
