//! # Core Models Module
//!
//! Data structures describing a molecule as the rest of the crate sees it: a
//! bond graph of [`atom::Atom`]s and [`topology::Bond`]s held by a
//! [`molecule::Molecule`], together with any number of [`conformer::Conformer`]s
//! that place every atom in 3D space.
//!
//! ## Key Components
//!
//! - [`atom`] - Atoms with element, formal charge, aromaticity and hybridization
//! - [`topology`] - Bond orders and bonds, including the ring flag set by perception
//! - [`conformer`] - One coordinate set for every atom, optionally with an energy
//! - [`molecule`] - The graph, its perception routines and its conformers
//!
//! ```ignore
//! use shapeprops::core::elements::element;
//! use shapeprops::core::models::{atom::Atom, molecule::Molecule, topology::BondOrder};
//!
//! let mut mol = Molecule::with_name("ethanol");
//! let c1 = mol.add_atom(Atom::new(element("C").unwrap()));
//! let c2 = mol.add_atom(Atom::new(element("C").unwrap()));
//! let o = mol.add_atom(Atom::new(element("O").unwrap()));
//! mol.add_bond(c1, c2, BondOrder::Single)?;
//! mol.add_bond(c2, o, BondOrder::Single)?;
//! mol.perceive();
//! ```

pub mod atom;
pub mod conformer;
pub mod molecule;
pub mod topology;
