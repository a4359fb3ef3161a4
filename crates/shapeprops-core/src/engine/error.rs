use thiserror::Error;

use super::config::ConfigError;
use crate::core::forcefield::params::ParamLoadError;
use crate::core::geometry::point_cloud::GeometryError;
use crate::core::io::sdf::SdfError;
use crate::core::io::smiles::SmilesError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid structure: {0}")]
    InvalidStructure(String),

    #[error("Conformer generation produced no conformers")]
    EmptyEnsemble,

    #[error("Conformer {conformer} cannot be used for descriptors: {source}")]
    NonFiniteCoordinates {
        conformer: usize,
        source: GeometryError,
    },

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Force field parameters unavailable: {source}")]
    ForceField {
        #[from]
        source: ParamLoadError,
    },
}

impl From<SmilesError> for EngineError {
    fn from(err: SmilesError) -> Self {
        Self::InvalidStructure(err.to_string())
    }
}

impl From<SdfError> for EngineError {
    fn from(err: SdfError) -> Self {
        Self::InvalidStructure(format!("mol block rejected: {err}"))
    }
}
