use phf::{Map, phf_map};

/// Static chemical data for a single element.
///
/// Masses are standard atomic weights in g/mol, radii are in Angstroms
/// (single-bond covalent radii and van der Waals radii). `valences` lists the
/// default valences used to infer implicit hydrogens, in increasing order; an
/// empty slice means the element never receives implicit hydrogens.
#[derive(Debug, PartialEq)]
pub struct ElementData {
    pub symbol: &'static str,
    pub atomic_number: u8,
    pub mass: f64,
    pub covalent_radius: f64,
    pub vdw_radius: f64,
    pub valences: &'static [u8],
}

impl ElementData {
    pub fn is_hydrogen(&self) -> bool {
        self.atomic_number == 1
    }

    pub fn is_carbon(&self) -> bool {
        self.atomic_number == 6
    }
}

macro_rules! element {
    ($sym:literal, $z:literal, $mass:literal, $cov:literal, $vdw:literal, [$($v:literal),*]) => {
        ElementData {
            symbol: $sym,
            atomic_number: $z,
            mass: $mass,
            covalent_radius: $cov,
            vdw_radius: $vdw,
            valences: &[$($v),*],
        }
    };
}

static ELEMENTS: Map<&'static str, ElementData> = phf_map! {
    "H" => element!("H", 1, 1.00794, 0.31, 1.20, [1]),
    "He" => element!("He", 2, 4.002602, 0.28, 1.40, []),
    "Li" => element!("Li", 3, 6.941, 1.28, 1.82, []),
    "Be" => element!("Be", 4, 9.012182, 0.96, 1.53, []),
    "B" => element!("B", 5, 10.811, 0.84, 1.92, [3]),
    "C" => element!("C", 6, 12.0107, 0.76, 1.70, [4]),
    "N" => element!("N", 7, 14.0067, 0.71, 1.55, [3, 5]),
    "O" => element!("O", 8, 15.9994, 0.66, 1.52, [2]),
    "F" => element!("F", 9, 18.9984032, 0.57, 1.47, [1]),
    "Ne" => element!("Ne", 10, 20.1797, 0.58, 1.54, []),
    "Na" => element!("Na", 11, 22.98976928, 1.66, 2.27, []),
    "Mg" => element!("Mg", 12, 24.305, 1.41, 1.73, []),
    "Al" => element!("Al", 13, 26.9815386, 1.21, 1.84, []),
    "Si" => element!("Si", 14, 28.0855, 1.11, 2.10, []),
    "P" => element!("P", 15, 30.973762, 1.07, 1.80, [3, 5]),
    "S" => element!("S", 16, 32.065, 1.05, 1.80, [2, 4, 6]),
    "Cl" => element!("Cl", 17, 35.453, 1.02, 1.75, [1]),
    "Ar" => element!("Ar", 18, 39.948, 1.06, 1.88, []),
    "K" => element!("K", 19, 39.0983, 2.03, 2.75, []),
    "Ca" => element!("Ca", 20, 40.078, 1.76, 2.31, []),
    "Fe" => element!("Fe", 26, 55.845, 1.32, 2.04, []),
    "Co" => element!("Co", 27, 58.933195, 1.26, 2.00, []),
    "Ni" => element!("Ni", 28, 58.6934, 1.24, 1.63, []),
    "Cu" => element!("Cu", 29, 63.546, 1.32, 1.40, []),
    "Zn" => element!("Zn", 30, 65.409, 1.22, 1.39, []),
    "Ga" => element!("Ga", 31, 69.723, 1.22, 1.87, []),
    "Ge" => element!("Ge", 32, 72.64, 1.20, 2.11, []),
    "As" => element!("As", 33, 74.9216, 1.19, 1.85, []),
    "Se" => element!("Se", 34, 78.96, 1.20, 1.90, []),
    "Br" => element!("Br", 35, 79.904, 1.20, 1.85, [1]),
    "Kr" => element!("Kr", 36, 83.798, 1.16, 2.02, []),
    "Rb" => element!("Rb", 37, 85.4678, 2.20, 3.03, []),
    "Sr" => element!("Sr", 38, 87.62, 1.95, 2.49, []),
    "Ag" => element!("Ag", 47, 107.8682, 1.45, 1.72, []),
    "Sn" => element!("Sn", 50, 118.71, 1.39, 2.17, []),
    "Sb" => element!("Sb", 51, 121.76, 1.39, 2.06, []),
    "Te" => element!("Te", 52, 127.6, 1.38, 2.06, []),
    "I" => element!("I", 53, 126.90447, 1.39, 1.98, [1]),
    "Xe" => element!("Xe", 54, 131.293, 1.40, 2.16, []),
    "Cs" => element!("Cs", 55, 132.9054519, 2.44, 3.43, []),
    "Ba" => element!("Ba", 56, 137.327, 2.15, 2.68, []),
    "Pt" => element!("Pt", 78, 195.084, 1.36, 1.75, []),
    "Au" => element!("Au", 79, 196.966569, 1.36, 1.66, []),
    "Hg" => element!("Hg", 80, 200.59, 1.32, 1.55, []),
    "Pb" => element!("Pb", 82, 207.2, 1.46, 2.02, []),
    "Bi" => element!("Bi", 83, 208.9804, 1.48, 2.07, []),
};

/// Looks up an element by its case-sensitive symbol (e.g. `"C"`, `"Cl"`).
pub fn element(symbol: &str) -> Option<&'static ElementData> {
    ELEMENTS.get(symbol)
}

pub fn hydrogen() -> &'static ElementData {
    &ELEMENTS["H"]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_lookup_is_case_sensitive() {
        assert_eq!(element("C").map(|e| e.atomic_number), Some(6));
        assert_eq!(element("Cl").map(|e| e.atomic_number), Some(17));
        assert!(element("CL").is_none());
        assert!(element("c").is_none());
        assert!(element("Xx").is_none());
    }

    #[test]
    fn hydrogen_helper_matches_table_entry() {
        let h = hydrogen();
        assert!(h.is_hydrogen());
        assert_eq!(h.symbol, "H");
        assert_eq!(Some(h), element("H"));
    }

    #[test]
    fn organic_subset_has_default_valences() {
        for symbol in ["B", "C", "N", "O", "P", "S", "F", "Cl", "Br", "I"] {
            let data = element(symbol).unwrap();
            assert!(!data.valences.is_empty(), "{symbol} has no valences");
        }
        assert!(element("Na").unwrap().valences.is_empty());
    }

    #[test]
    fn every_entry_is_keyed_by_its_own_symbol() {
        for (key, data) in ELEMENTS.entries() {
            assert_eq!(*key, data.symbol);
            assert!(data.mass > 0.0);
            assert!(data.vdw_radius > data.covalent_radius);
        }
    }
}
