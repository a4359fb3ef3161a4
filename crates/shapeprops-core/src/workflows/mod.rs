//! # Workflows Module
//!
//! High-level entry points that run the complete descriptor pipeline for a molecule.
//!
//! ## Overview
//!
//! A workflow takes a SMILES string, asks a geometry provider for an initial 3D structure,
//! expands it into a conformer ensemble and averages the shape descriptors over that ensemble.
//! Topological descriptors (formula, weight, rotatable bonds) are computed once from the bond
//! graph.
//!
//! - **Properties Workflow** ([`properties`]) - Conformer-averaged globularity and
//!   plane-of-best-fit distance together with the topological descriptors.

pub mod properties;
