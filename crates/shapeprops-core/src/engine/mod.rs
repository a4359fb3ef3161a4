//! # Engine Module
//!
//! Configuration, error handling, progress reporting and the two pluggable collaborators of the
//! descriptor pipeline.
//!
//! ## Overview
//!
//! Descriptor averaging needs a 3D structure for the input SMILES and a diverse, low-energy
//! conformer ensemble built from it. Both steps sit behind traits defined in [`provider`] so the
//! averaging workflow can run against any cheminformatics backend. The crate ships default
//! implementations built on its own force field:
//!
//! - [`embedding::DistanceGeometryEmbedder`] turns a SMILES string into a single minimized
//!   conformer via distance bounds and classical multidimensional scaling.
//! - [`conformers::RotorSearchGenerator`] enumerates torsions about rotatable bonds, minimizes
//!   every trial and prunes the results by energy window and RMSD.
//!
//! ## Key Components
//!
//! - **Configuration** ([`config`]) - Search, embedding and descriptor settings with a validating builder
//! - **Error Handling** ([`error`]) - The [`error::EngineError`] type returned by every pipeline step
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events for front ends

pub mod config;
pub mod conformers;
pub mod embedding;
pub mod error;
pub mod progress;
pub mod provider;
