//! # Force Field Module
//!
//! A minimal valence force field used to relax embedded structures and
//! torsion-search trials. It is not a general-purpose molecular mechanics
//! engine: it only knows enough chemistry to keep bond lengths, angles and
//! planar groups sensible and to keep non-bonded atoms apart.
//!
//! ## Energy Terms
//!
//! - Harmonic bond stretch around bond-order corrected covalent radii
//! - Cosine-harmonic angle bend around the ideal angle of the central atom's hybridization
//! - Triple-product planarity for sp2 centers and across double or aromatic bonds
//! - Soft repulsion between atoms three or more bonds apart
//!
//! ## Key Components
//!
//! - [`params`] - Stiffness constants, with built-in defaults or loaded from TOML
//! - [`potentials`] - Scalar energy functions and their derivatives
//! - [`term`] - Per-term energy breakdown
//! - [`field`] - Term lists built from a molecule, energy and analytic gradient
//! - [`minimize`] - Adaptive steepest-descent minimizer
//!
//! ```ignore
//! use shapeprops::core::forcefield::{field::ForceField, minimize::*, params::ForceFieldParams};
//!
//! let ff = ForceField::new(&molecule, &ForceFieldParams::default());
//! let result = minimize(&ff, &mut positions, &MinimizerSettings::default());
//! println!("{:.3} kcal/mol", result.energy.total());
//! ```

pub mod field;
pub mod minimize;
pub mod params;
pub mod potentials;
pub mod term;
