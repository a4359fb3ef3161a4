use super::atom::{Atom, Hybridization};
use super::conformer::Conformer;
use super::topology::{Bond, BondOrder};
use std::collections::VecDeque;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoleculeError {
    #[error("Atom index {index} is out of range for a molecule with {count} atoms")]
    AtomIndexOutOfRange { index: usize, count: usize },
    #[error("An atom cannot be bonded to itself (atom {0})")]
    SelfBond(usize),
    #[error("Atoms {0} and {1} are already bonded")]
    DuplicateBond(usize, usize),
    #[error("Conformer has {found} positions but the molecule has {expected} atoms")]
    ConformerSizeMismatch { expected: usize, found: usize },
}

/// A molecular graph together with the conformers that share it.
///
/// Atoms and bonds are addressed by their insertion index. Conformers are
/// stored in the order they were added and must provide one position per atom.
#[derive(Debug, Clone, Default)]
pub struct Molecule {
    /// Title of the molecule (the SMILES string for embedded structures).
    name: String,
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    /// `(neighbor, bond index)` pairs for every atom.
    adjacency: Vec<Vec<(usize, usize)>>,
    conformers: Vec<Conformer>,
}

impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Appends an atom and returns its index.
    pub fn add_atom(&mut self, atom: Atom) -> usize {
        self.atoms.push(atom);
        self.adjacency.push(Vec::new());
        self.atoms.len() - 1
    }

    /// Connects two existing atoms and returns the new bond's index.
    ///
    /// # Errors
    ///
    /// Fails if either index is out of range, if both indices are equal, or if
    /// the atoms are already bonded.
    pub fn add_bond(
        &mut self,
        atom1: usize,
        atom2: usize,
        order: BondOrder,
    ) -> Result<usize, MoleculeError> {
        for index in [atom1, atom2] {
            if index >= self.atoms.len() {
                return Err(MoleculeError::AtomIndexOutOfRange {
                    index,
                    count: self.atoms.len(),
                });
            }
        }
        if atom1 == atom2 {
            return Err(MoleculeError::SelfBond(atom1));
        }
        if self.bond_between(atom1, atom2).is_some() {
            return Err(MoleculeError::DuplicateBond(atom1, atom2));
        }

        let bond_index = self.bonds.len();
        self.bonds.push(Bond::new(atom1, atom2, order));
        self.adjacency[atom1].push((atom2, bond_index));
        self.adjacency[atom2].push((atom1, bond_index));
        Ok(bond_index)
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    pub fn atom_mut(&mut self, index: usize) -> Option<&mut Atom> {
        self.atoms.get_mut(index)
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn bond(&self, index: usize) -> Option<&Bond> {
        self.bonds.get(index)
    }

    /// Mutable access to a bond's order and ring flag; the endpoints are
    /// fixed once the bond is added.
    pub fn bond_mut(&mut self, index: usize) -> Option<&mut Bond> {
        self.bonds.get_mut(index)
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn heavy_atom_count(&self) -> usize {
        self.atoms.iter().filter(|a| a.is_heavy()).count()
    }

    pub fn heavy_atom_indices(&self) -> Vec<usize> {
        self.atoms
            .iter()
            .enumerate()
            .filter(|(_, a)| a.is_heavy())
            .map(|(i, _)| i)
            .collect()
    }

    /// `(neighbor, bond index)` pairs of an atom; empty for unknown indices.
    pub fn connections(&self, atom: usize) -> &[(usize, usize)] {
        self.adjacency.get(atom).map_or(&[], |v| v.as_slice())
    }

    pub fn neighbors(&self, atom: usize) -> impl Iterator<Item = usize> + '_ {
        self.connections(atom).iter().map(|&(n, _)| n)
    }

    pub fn degree(&self, atom: usize) -> usize {
        self.connections(atom).len()
    }

    /// Number of non-hydrogen neighbors of an atom.
    pub fn heavy_degree(&self, atom: usize) -> usize {
        self.neighbors(atom)
            .filter(|&n| self.atoms[n].is_heavy())
            .count()
    }

    pub fn bond_between(&self, atom1: usize, atom2: usize) -> Option<usize> {
        self.connections(atom1)
            .iter()
            .find(|&&(n, _)| n == atom2)
            .map(|&(_, b)| b)
    }

    pub fn total_charge(&self) -> i32 {
        self.atoms.iter().map(|a| a.formal_charge as i32).sum()
    }

    pub fn conformers(&self) -> &[Conformer] {
        &self.conformers
    }

    pub fn conformer(&self, index: usize) -> Option<&Conformer> {
        self.conformers.get(index)
    }

    pub fn conformer_count(&self) -> usize {
        self.conformers.len()
    }

    /// Adds a conformer and returns its index.
    ///
    /// # Errors
    ///
    /// Fails if the conformer does not provide exactly one position per atom.
    pub fn add_conformer(&mut self, conformer: Conformer) -> Result<usize, MoleculeError> {
        if conformer.len() != self.atoms.len() {
            return Err(MoleculeError::ConformerSizeMismatch {
                expected: self.atoms.len(),
                found: conformer.len(),
            });
        }
        self.conformers.push(conformer);
        Ok(self.conformers.len() - 1)
    }

    /// Replaces all conformers at once, validating each of them.
    pub fn set_conformers(&mut self, conformers: Vec<Conformer>) -> Result<(), MoleculeError> {
        if let Some(bad) = conformers.iter().find(|c| c.len() != self.atoms.len()) {
            return Err(MoleculeError::ConformerSizeMismatch {
                expected: self.atoms.len(),
                found: bad.len(),
            });
        }
        self.conformers = conformers;
        Ok(())
    }

    pub fn take_conformers(&mut self) -> Vec<Conformer> {
        std::mem::take(&mut self.conformers)
    }

    /// Runs ring and hybridization perception.
    ///
    /// Must be called after the graph is complete (including explicit hydrogens)
    /// and before rotor classification or force-field setup.
    pub fn perceive(&mut self) {
        self.perceive_rings();
        self.perceive_hybridization();
    }

    /// Flags every bond that belongs to at least one ring.
    ///
    /// A bond is a ring bond exactly when its two atoms stay connected after
    /// the bond is removed.
    pub fn perceive_rings(&mut self) {
        let ring_flags: Vec<bool> = (0..self.bonds.len())
            .map(|b| {
                let bond = self.bonds[b];
                self.reachable_without_bond(bond.atom2, b)[bond.atom1]
            })
            .collect();
        for (bond, in_ring) in self.bonds.iter_mut().zip(ring_flags) {
            bond.in_ring = in_ring;
        }
    }

    pub fn perceive_hybridization(&mut self) {
        let first_pass: Vec<Hybridization> = (0..self.atoms.len())
            .map(|i| self.hybridization_from_bonds(i))
            .collect();

        let mut result = first_pass.clone();
        for (i, atom) in self.atoms.iter().enumerate() {
            // Nitrogens conjugated with a pi system are planar.
            let conjugated = self
                .neighbors(i)
                .any(|n| matches!(first_pass[n], Hybridization::Sp2 | Hybridization::Sp));
            if atom.element.atomic_number == 7
                && first_pass[i] == Hybridization::Sp3
                && self.degree(i) <= 3
                && conjugated
            {
                result[i] = Hybridization::Sp2;
            }
        }

        for (atom, hybridization) in self.atoms.iter_mut().zip(result) {
            atom.hybridization = hybridization;
        }
    }

    fn hybridization_from_bonds(&self, atom: usize) -> Hybridization {
        let degree = self.degree(atom);
        if degree > 4 {
            return Hybridization::Hypervalent;
        }
        if degree == 4 {
            return Hybridization::Sp3;
        }
        if self.atoms[atom].aromatic {
            return Hybridization::Sp2;
        }
        let (mut doubles, mut triples, mut aromatic) = (0, 0, 0);
        for &(_, b) in self.connections(atom) {
            match self.bonds[b].order {
                BondOrder::Double => doubles += 1,
                BondOrder::Triple => triples += 1,
                BondOrder::Aromatic => aromatic += 1,
                BondOrder::Single => {}
            }
        }
        if triples > 0 || doubles >= 2 {
            Hybridization::Sp
        } else if doubles + aromatic > 0 {
            Hybridization::Sp2
        } else {
            Hybridization::Sp3
        }
    }

    /// Whether a bond is a rotor: a single, non-ring bond between two heavy,
    /// non-sp atoms that each have at least one other heavy neighbor.
    ///
    /// Torsions about a bond to an sp center do not change the geometry, so
    /// bonds next to triple bonds and cumulenes never rotate.
    pub fn is_rotor(&self, bond_index: usize) -> bool {
        let Some(bond) = self.bonds.get(bond_index) else {
            return false;
        };
        let (a, b) = (&self.atoms[bond.atom1], &self.atoms[bond.atom2]);
        bond.order == BondOrder::Single
            && !bond.in_ring
            && a.is_heavy()
            && b.is_heavy()
            && a.hybridization != Hybridization::Sp
            && b.hybridization != Hybridization::Sp
            && self.heavy_degree(bond.atom1) > 1
            && self.heavy_degree(bond.atom2) > 1
    }

    /// Whether a bond is the C–N bond of an amide linkage C(=O)–N.
    pub fn is_amide(&self, bond_index: usize) -> bool {
        let Some(bond) = self.bonds.get(bond_index) else {
            return false;
        };
        if bond.order != BondOrder::Single {
            return false;
        }
        let z1 = self.atoms[bond.atom1].element.atomic_number;
        let z2 = self.atoms[bond.atom2].element.atomic_number;
        let carbon = match (z1, z2) {
            (6, 7) => bond.atom1,
            (7, 6) => bond.atom2,
            _ => return false,
        };
        self.is_carbonyl_carbon(carbon)
    }

    fn is_carbonyl_carbon(&self, atom: usize) -> bool {
        self.connections(atom).iter().any(|&(n, b)| {
            self.bonds[b].order == BondOrder::Double && self.atoms[n].element.atomic_number == 8
        })
    }

    /// Atoms reachable from `start` without traversing `excluded_bond`.
    pub fn reachable_without_bond(&self, start: usize, excluded_bond: usize) -> Vec<bool> {
        let mut seen = vec![false; self.atoms.len()];
        if start >= self.atoms.len() {
            return seen;
        }
        let mut queue = VecDeque::from([start]);
        seen[start] = true;
        while let Some(current) = queue.pop_front() {
            for &(next, b) in self.connections(current) {
                if b != excluded_bond && !seen[next] {
                    seen[next] = true;
                    queue.push_back(next);
                }
            }
        }
        seen
    }

    /// The atoms on the `atom2` side of a bond, or `None` for ring bonds.
    pub fn bond_side(&self, bond_index: usize) -> Option<Vec<usize>> {
        let bond = self.bonds.get(bond_index)?;
        let seen = self.reachable_without_bond(bond.atom2, bond_index);
        if seen[bond.atom1] {
            return None;
        }
        Some(
            seen.iter()
                .enumerate()
                .filter(|(_, s)| **s)
                .map(|(i, _)| i)
                .collect(),
        )
    }

    /// All-pairs shortest path lengths in bonds; `usize::MAX` marks
    /// atoms in disconnected fragments.
    pub fn topological_distances(&self) -> Vec<Vec<usize>> {
        let n = self.atoms.len();
        let mut dist = vec![vec![usize::MAX; n]; n];
        for (start, row) in dist.iter_mut().enumerate() {
            row[start] = 0;
            let mut queue = VecDeque::from([start]);
            while let Some(current) = queue.pop_front() {
                for next in self.neighbors(current) {
                    if row[next] == usize::MAX {
                        row[next] = row[current] + 1;
                        queue.push_back(next);
                    }
                }
            }
        }
        dist
    }
}
