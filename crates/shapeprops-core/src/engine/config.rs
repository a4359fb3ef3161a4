use crate::core::forcefield::minimize::MinimizerSettings;
use crate::core::forcefield::params::ForceFieldParams;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidParameter {
        name,
        reason: reason.into(),
    }
}

fn check_non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_nan() || value < 0.0 {
        return Err(invalid(name, format!("must be non-negative (got {value})")));
    }
    Ok(())
}

fn check_minimizer(name: &'static str, settings: &MinimizerSettings) -> Result<(), ConfigError> {
    let positive = settings.gradient_tolerance > 0.0
        && settings.initial_step > 0.0
        && settings.max_step > 0.0;
    if !positive {
        return Err(invalid(
            name,
            "gradient tolerance and step lengths must be positive",
        ));
    }
    if settings.initial_step > settings.max_step {
        return Err(invalid(
            name,
            format!(
                "initial step {} exceeds the maximum step {}",
                settings.initial_step, settings.max_step
            ),
        ));
    }
    Ok(())
}

/// Settings of the conformer ensemble search.
#[derive(Debug, Clone, PartialEq)]
pub struct ConformerSearchConfig {
    /// Heavy-atom RMSD (Å) a conformer must exceed against every kept one.
    pub rmsd_cutoff: f64,
    /// Upper bound on the number of torsion trials, and thus on the ensemble size.
    pub max_conformers: usize,
    /// Energy window (kcal/mol) above the lowest conformer.
    pub energy_cutoff: f64,
    /// Log the rotatable bonds and search statistics at info level.
    pub verbose: bool,
    /// Torsion offsets in degrees applied to each rotatable bond.
    pub torsion_increments: Vec<f64>,
    /// Minimizer settings for every trial.
    pub minimization: MinimizerSettings,
}

impl Default for ConformerSearchConfig {
    fn default() -> Self {
        Self {
            rmsd_cutoff: 0.5,
            max_conformers: 100_000,
            energy_cutoff: 50.0,
            verbose: false,
            torsion_increments: vec![0.0, 120.0, 240.0],
            minimization: MinimizerSettings {
                max_iterations: 500,
                ..MinimizerSettings::default()
            },
        }
    }
}

impl ConformerSearchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_non_negative("rmsd_cutoff", self.rmsd_cutoff)?;
        check_non_negative("energy_cutoff", self.energy_cutoff)?;
        if self.max_conformers == 0 {
            return Err(invalid("max_conformers", "must be at least 1"));
        }
        if self.torsion_increments.is_empty() {
            return Err(ConfigError::MissingParameter("torsion_increments"));
        }
        if self.torsion_increments.iter().any(|a| !a.is_finite()) {
            return Err(invalid("torsion_increments", "angles must be finite"));
        }
        check_minimizer("search.minimization", &self.minimization)
    }
}

/// Settings of the initial 3D embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingConfig {
    pub seed: u64,
    /// Amplitude (Å) of the uniform noise added to the scaled coordinates.
    pub jitter: f64,
    pub minimization: MinimizerSettings,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            jitter: 0.05,
            minimization: MinimizerSettings {
                max_iterations: 5000,
                ..MinimizerSettings::default()
            },
        }
    }
}

impl EmbeddingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.jitter.is_finite() || self.jitter < 0.0 {
            return Err(invalid(
                "jitter",
                format!("must be finite and non-negative (got {})", self.jitter),
            ));
        }
        check_minimizer("embedding.minimization", &self.minimization)
    }
}

/// Complete configuration of a descriptor-averaging run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertiesConfig {
    pub embedding: EmbeddingConfig,
    pub search: ConformerSearchConfig,
    pub forcefield: ForceFieldParams,
    /// Evaluate shape descriptors on heavy atoms only.
    pub heavy_atoms_only: bool,
}

impl PropertiesConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.embedding.validate()?;
        self.search.validate()?;
        self.forcefield
            .validate()
            .map_err(|e| invalid("forcefield", e.to_string()))
    }
}

#[derive(Default)]
pub struct PropertiesConfigBuilder {
    rmsd_cutoff: Option<f64>,
    max_conformers: Option<usize>,
    energy_cutoff: Option<f64>,
    verbose: Option<bool>,
    torsion_increments: Option<Vec<f64>>,
    search_minimization: Option<MinimizerSettings>,
    seed: Option<u64>,
    jitter: Option<f64>,
    embedding_minimization: Option<MinimizerSettings>,
    forcefield: Option<ForceFieldParams>,
    heavy_atoms_only: Option<bool>,
}

impl PropertiesConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rmsd_cutoff(mut self, cutoff: f64) -> Self {
        self.rmsd_cutoff = Some(cutoff);
        self
    }
    pub fn max_conformers(mut self, count: usize) -> Self {
        self.max_conformers = Some(count);
        self
    }
    pub fn energy_cutoff(mut self, cutoff: f64) -> Self {
        self.energy_cutoff = Some(cutoff);
        self
    }
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }
    pub fn torsion_increments(mut self, angles: Vec<f64>) -> Self {
        self.torsion_increments = Some(angles);
        self
    }
    pub fn search_minimization(mut self, settings: MinimizerSettings) -> Self {
        self.search_minimization = Some(settings);
        self
    }
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
    pub fn jitter(mut self, amplitude: f64) -> Self {
        self.jitter = Some(amplitude);
        self
    }
    pub fn embedding_minimization(mut self, settings: MinimizerSettings) -> Self {
        self.embedding_minimization = Some(settings);
        self
    }
    pub fn forcefield(mut self, params: ForceFieldParams) -> Self {
        self.forcefield = Some(params);
        self
    }
    pub fn heavy_atoms_only(mut self, heavy_only: bool) -> Self {
        self.heavy_atoms_only = Some(heavy_only);
        self
    }

    /// Fills unset values with their defaults and validates the result.
    pub fn build(self) -> Result<PropertiesConfig, ConfigError> {
        let search_defaults = ConformerSearchConfig::default();
        let embedding_defaults = EmbeddingConfig::default();

        let config = PropertiesConfig {
            embedding: EmbeddingConfig {
                seed: self.seed.unwrap_or(embedding_defaults.seed),
                jitter: self.jitter.unwrap_or(embedding_defaults.jitter),
                minimization: self
                    .embedding_minimization
                    .unwrap_or(embedding_defaults.minimization),
            },
            search: ConformerSearchConfig {
                rmsd_cutoff: self.rmsd_cutoff.unwrap_or(search_defaults.rmsd_cutoff),
                max_conformers: self.max_conformers.unwrap_or(search_defaults.max_conformers),
                energy_cutoff: self.energy_cutoff.unwrap_or(search_defaults.energy_cutoff),
                verbose: self.verbose.unwrap_or(search_defaults.verbose),
                torsion_increments: self
                    .torsion_increments
                    .unwrap_or(search_defaults.torsion_increments),
                minimization: self
                    .search_minimization
                    .unwrap_or(search_defaults.minimization),
            },
            forcefield: self.forcefield.unwrap_or_default(),
            heavy_atoms_only: self.heavy_atoms_only.unwrap_or(false),
        };
        config.validate()?;
        Ok(config)
    }
}
