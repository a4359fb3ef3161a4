use crate::core::models::molecule::Molecule;

/// Indices of the bonds that count as rotatable: rotors that are not amide
/// C–N bonds.
pub fn rotatable_bonds(molecule: &Molecule) -> Vec<usize> {
    (0..molecule.bond_count())
        .filter(|&b| molecule.is_rotor(b) && !molecule.is_amide(b))
        .collect()
}

/// Number of rotatable bonds. Depends on the bond graph only, never on
/// coordinates.
pub fn rotatable_bond_count(molecule: &Molecule) -> u32 {
    rotatable_bonds(molecule).len() as u32
}
