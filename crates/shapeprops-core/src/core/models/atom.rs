use crate::core::elements::{self, ElementData};
use std::fmt;
use std::str::FromStr;

/// Orbital hybridization of an atom, as perceived from its bonding pattern.
///
/// The hybridization determines the ideal bond angle around an atom in the
/// force field and whether the atom is kept planar with its neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Hybridization {
    /// Linear centers (triple bonds, cumulated double bonds).
    Sp,
    /// Trigonal planar centers (double bonds, aromatic atoms, conjugated nitrogens).
    Sp2,
    /// Tetrahedral centers.
    #[default]
    Sp3,
    /// Hypervalent centers with more than four neighbors; no ideal angle is imposed.
    Hypervalent,
}

impl Hybridization {
    /// Ideal bond angle in degrees around a center of this hybridization.
    pub fn ideal_angle_degrees(&self) -> Option<f64> {
        match self {
            Self::Sp => Some(180.0),
            Self::Sp2 => Some(120.0),
            Self::Sp3 => Some(109.471_220_634_490_7),
            Self::Hypervalent => None,
        }
    }
}

impl fmt::Display for Hybridization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Sp => "sp",
            Self::Sp2 => "sp2",
            Self::Sp3 => "sp3",
            Self::Hypervalent => "hypervalent",
        };
        f.write_str(s)
    }
}

impl FromStr for Hybridization {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sp" | "1" => Ok(Self::Sp),
            "sp2" | "2" => Ok(Self::Sp2),
            "sp3" | "3" => Ok(Self::Sp3),
            "hypervalent" => Ok(Self::Hypervalent),
            _ => Err(()),
        }
    }
}

/// An atom of a molecular graph.
///
/// Coordinates are not stored on the atom: they belong to the conformers of
/// the owning [`Molecule`](super::molecule::Molecule), indexed by atom position.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The chemical element of the atom.
    pub element: &'static ElementData,
    /// The formal charge in elementary charge units.
    pub formal_charge: i8,
    /// The isotope mass number, if one was specified.
    pub isotope: Option<u16>,
    /// Whether the atom was read as part of an aromatic system.
    pub aromatic: bool,
    /// The perceived hybridization (defaults to sp3 until perception runs).
    pub hybridization: Hybridization,
}

impl Atom {
    /// Creates a neutral, non-aromatic atom of the given element.
    pub fn new(element: &'static ElementData) -> Self {
        Self {
            element,
            formal_charge: 0,
            isotope: None,
            aromatic: false,
            hybridization: Hybridization::default(),
        }
    }

    /// Creates a hydrogen atom.
    pub fn hydrogen() -> Self {
        Self::new(elements::hydrogen())
    }

    pub fn symbol(&self) -> &'static str {
        self.element.symbol
    }

    pub fn is_hydrogen(&self) -> bool {
        self.element.is_hydrogen()
    }

    pub fn is_heavy(&self) -> bool {
        !self.is_hydrogen()
    }
}
