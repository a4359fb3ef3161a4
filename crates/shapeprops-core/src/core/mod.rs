//! # Core Module
//!
//! Fundamental building blocks for computing molecular shape descriptors.
//!
//! - **Element Data** ([`elements`]) - Static per-element properties (weights, radii, valences)
//! - **Molecular Representation** ([`models`]) - Atoms, bonds, molecules and their conformers
//! - **File I/O** ([`io`]) - SMILES reading and MDL mol block / SDF reading and writing
//! - **Geometry** ([`geometry`]) - Point clouds, best-fit planes, superposition and rotations
//! - **Energy Model** ([`forcefield`]) - A minimal valence force field and energy minimizer
//! - **Descriptors** ([`descriptors`]) - Globularity, plane-fit distance, rotatable bonds, composition

pub mod descriptors;
pub mod elements;
pub mod forcefield;
pub mod geometry;
pub mod io;
pub mod models;
