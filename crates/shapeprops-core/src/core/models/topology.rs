use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum BondOrder {
    #[default]
    Single = 1,
    Double = 2,
    Triple = 3,
    Aromatic = 4,
}

impl BondOrder {
    /// Bond order as a real number, with aromatic bonds counted as 1.5.
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Single => 1.0,
            Self::Double => 2.0,
            Self::Triple => 3.0,
            Self::Aromatic => 1.5,
        }
    }

    /// Contribution to an atom's explicit valence; aromatic bonds count once.
    pub fn valence(&self) -> u8 {
        match self {
            Self::Single | Self::Aromatic => 1,
            Self::Double => 2,
            Self::Triple => 3,
        }
    }

    /// Bond type code used in MDL connection tables.
    pub fn mdl_code(&self) -> u8 {
        *self as u8
    }

    pub fn from_mdl_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Single),
            2 => Some(Self::Double),
            3 => Some(Self::Triple),
            4 => Some(Self::Aromatic),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
#[error("Invalid bond order string")]
pub struct ParseBondOrderError;

impl FromStr for BondOrder {
    type Err = ParseBondOrderError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1" | "s" | "single" | "-" => Ok(Self::Single),
            "2" | "d" | "double" | "=" => Ok(Self::Double),
            "3" | "t" | "triple" | "#" => Ok(Self::Triple),
            "4" | "ar" | "aromatic" | ":" => Ok(Self::Aromatic),
            _ => Err(ParseBondOrderError),
        }
    }
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Single => "Single",
                Self::Double => "Double",
                Self::Triple => "Triple",
                Self::Aromatic => "Aromatic",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub atom1: usize,     // index of the first atom
    pub atom2: usize,     // index of the second atom
    pub order: BondOrder, // bond order (single, double, ...)
    pub in_ring: bool,    // set by ring perception
}

impl Bond {
    pub fn new(atom1: usize, atom2: usize, order: BondOrder) -> Self {
        Self {
            atom1,
            atom2,
            order,
            in_ring: false,
        }
    }

    pub fn contains(&self, atom: usize) -> bool {
        self.atom1 == atom || self.atom2 == atom
    }

    /// Returns the atom on the other end of the bond, if `atom` is one of its ends.
    pub fn partner(&self, atom: usize) -> Option<usize> {
        if self.atom1 == atom {
            Some(self.atom2)
        } else if self.atom2 == atom {
            Some(self.atom1)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bond_order_from_str_parses_valid_strings() {
        assert_eq!("1".parse::<BondOrder>().unwrap(), BondOrder::Single);
        assert_eq!("single".parse::<BondOrder>().unwrap(), BondOrder::Single);
        assert_eq!("=".parse::<BondOrder>().unwrap(), BondOrder::Double);
        assert_eq!("T".parse::<BondOrder>().unwrap(), BondOrder::Triple);
        assert_eq!("ar".parse::<BondOrder>().unwrap(), BondOrder::Aromatic);
        assert_eq!(":".parse::<BondOrder>().unwrap(), BondOrder::Aromatic);
    }

    #[test]
    fn bond_order_from_str_rejects_invalid_strings() {
        assert!("".parse::<BondOrder>().is_err());
        assert!("quadruple".parse::<BondOrder>().is_err());
        assert!("0".parse::<BondOrder>().is_err());
    }

    #[test]
    fn bond_order_default_is_single() {
        assert_eq!(BondOrder::default(), BondOrder::Single);
    }

    #[test]
    fn aromatic_bonds_count_once_towards_valence() {
        assert_eq!(BondOrder::Aromatic.valence(), 1);
        assert_eq!(BondOrder::Aromatic.as_f64(), 1.5);
        assert_eq!(BondOrder::Triple.valence(), 3);
    }

    #[test]
    fn mdl_codes_match_connection_table_convention() {
        assert_eq!(BondOrder::Single.mdl_code(), 1);
        assert_eq!(BondOrder::Aromatic.mdl_code(), 4);
        assert_eq!(BondOrder::from_mdl_code(2), Some(BondOrder::Double));
        assert_eq!(BondOrder::from_mdl_code(8), None);
    }

    #[test]
    fn bond_partner_and_contains() {
        let bond = Bond::new(3, 7, BondOrder::Double);
        assert!(bond.contains(3));
        assert!(bond.contains(7));
        assert!(!bond.contains(5));
        assert_eq!(bond.partner(3), Some(7));
        assert_eq!(bond.partner(7), Some(3));
        assert_eq!(bond.partner(1), None);
        assert!(!bond.in_ring);
    }
}
