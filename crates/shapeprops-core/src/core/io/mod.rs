//! Provides input/output functionality for molecular formats.
//!
//! Structures enter the crate either as SMILES strings ([`smiles`]) or as MDL
//! V2000 connection tables ([`sdf`]). File-based formats share the
//! [`traits::MolecularFile`] interface.

pub mod sdf;
pub mod smiles;
pub mod traits;
