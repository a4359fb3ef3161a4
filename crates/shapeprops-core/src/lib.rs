//! # shapeprops Core Library
//!
//! Conformer-averaged 3D shape and topology descriptors for small molecules given as SMILES:
//! globularity, plane-of-best-fit distance, rotatable-bond count, molecular formula and weight.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Molecule`, `Conformer`), element data,
//!   SMILES and SDF I/O, geometric primitives (point clouds, plane fitting, superposition), a small
//!   valence force field with its minimizer, and the descriptor functions themselves.
//!
//! - **[`engine`]: The Collaborators.** Configuration, errors and progress reporting, plus the two
//!   pluggable collaborators of the pipeline: the [`engine::provider::GeometryProvider`] that turns
//!   SMILES into an initial 3D structure, and the [`engine::provider::ConformerGenerator`] that
//!   expands it into a diverse low-energy ensemble.
//!
//! - **[`workflows`]: The Public API.** The averaging driver that ties everything together and
//!   produces a [`workflows::properties::PropertyRecord`].
//!
//! ```ignore
//! let record = shapeprops::workflows::properties::average_properties("c1ccccc1")?;
//! assert_eq!(record.rb, 0);
//! ```

pub mod core;
pub mod engine;
pub mod workflows;
