use super::config::ConformerSearchConfig;
use super::error::EngineError;
use super::progress::ProgressReporter;
use crate::core::models::molecule::Molecule;

pub use crate::core::io::sdf::StructureBlock;

/// Produces an initial 3D structure for a SMILES string.
pub trait GeometryProvider {
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidStructure`] when the SMILES cannot be
    /// parsed or no finite embedding is found.
    fn embed(&self, smiles: &str) -> Result<StructureBlock, EngineError>;
}

/// Expands a single structure into a conformer ensemble.
///
/// The returned molecule carries the same bond graph as `structure` and one
/// conformer per ensemble member, lowest energy first.
pub trait ConformerGenerator {
    fn generate(
        &self,
        structure: &StructureBlock,
        config: &ConformerSearchConfig,
        reporter: &ProgressReporter,
    ) -> Result<Molecule, EngineError>;
}
