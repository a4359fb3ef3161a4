use crate::core::elements::{self, ElementData};
use crate::core::models::atom::Atom;
use crate::core::models::molecule::{Molecule, MoleculeError};
use crate::core::models::topology::BondOrder;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid SMILES at position {position}: {kind}")]
pub struct SmilesError {
    /// Byte offset into the input where the problem was detected.
    pub position: usize,
    pub kind: SmilesErrorKind,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SmilesErrorKind {
    #[error("input is empty")]
    EmptyInput,
    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),
    #[error("unknown element '{0}'")]
    UnknownElement(String),
    #[error("invalid bracket atom: {0}")]
    InvalidBracketAtom(String),
    #[error("branch opened here is never closed")]
    UnclosedBranch,
    #[error("unmatched ')'")]
    UnmatchedParenthesis,
    #[error("ring bond {0} is never closed")]
    UnclosedRing(u16),
    #[error("ring bond {0} has conflicting bond orders")]
    ConflictingRingBond(u16),
    #[error("bond symbol is not followed by an atom")]
    DanglingBond,
    #[error("{0}")]
    Graph(#[from] MoleculeError),
}

/// Hydrogen count attached to an atom while parsing.
#[derive(Debug, Clone, Copy)]
enum HydrogenCount {
    /// Organic-subset atom: derived from the default valences once bonding is known.
    Implicit,
    /// Bracket atom: exactly the stated count.
    Explicit(u8),
}

struct RingOpening {
    atom: usize,
    order: Option<BondOrder>,
}

struct Parser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    molecule: Molecule,
    hydrogens: Vec<HydrogenCount>,
    previous: Option<usize>,
    pending_bond: Option<(BondOrder, usize)>,
    branches: Vec<(usize, usize)>,
    rings: HashMap<u16, (RingOpening, usize)>,
}

/// Parses a SMILES string into a molecule with explicit hydrogens.
///
/// Ring membership and hybridization are perceived before the molecule is
/// returned. Stereochemistry (`@`, `/`, `\`) is accepted and discarded; the
/// resulting molecule has no conformers.
///
/// # Errors
///
/// Returns a [`SmilesError`] with the byte position of the first problem.
pub fn parse_smiles(input: &str) -> Result<Molecule, SmilesError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(SmilesError {
            position: 0,
            kind: SmilesErrorKind::EmptyInput,
        });
    }
    let mut parser = Parser::new(trimmed);
    parser.parse()?;
    let mut molecule = parser.finish()?;
    molecule.set_name(trimmed);
    molecule.perceive_rings();
    // Implicit bonds between aromatic atoms of different rings are single.
    for index in 0..molecule.bond_count() {
        if let Some(bond) = molecule.bond_mut(index) {
            if bond.order == BondOrder::Aromatic && !bond.in_ring {
                bond.order = BondOrder::Single;
            }
        }
    }
    molecule.perceive_hybridization();
    Ok(molecule)
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            molecule: Molecule::new(),
            hydrogens: Vec::new(),
            previous: None,
            pending_bond: None,
            branches: Vec::new(),
            rings: HashMap::new(),
        }
    }

    fn error(&self, kind: SmilesErrorKind) -> SmilesError {
        SmilesError {
            position: self.pos,
            kind,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn unexpected(&self) -> SmilesError {
        let c = self.input[self.pos..].chars().next().unwrap_or('\0');
        self.error(SmilesErrorKind::UnexpectedCharacter(c))
    }

    fn parse(&mut self) -> Result<(), SmilesError> {
        while let Some(c) = self.peek() {
            match c {
                b'(' => {
                    let Some(previous) = self.previous else {
                        return Err(self.unexpected());
                    };
                    if self.pending_bond.is_some() {
                        return Err(self.error(SmilesErrorKind::DanglingBond));
                    }
                    self.branches.push((previous, self.pos));
                    self.pos += 1;
                }
                b')' => {
                    if self.pending_bond.is_some() {
                        return Err(self.error(SmilesErrorKind::DanglingBond));
                    }
                    let Some((anchor, _)) = self.branches.pop() else {
                        return Err(self.error(SmilesErrorKind::UnmatchedParenthesis));
                    };
                    self.previous = Some(anchor);
                    self.pos += 1;
                }
                b'.' => {
                    if self.pending_bond.is_some() {
                        return Err(self.error(SmilesErrorKind::DanglingBond));
                    }
                    self.previous = None;
                    self.pos += 1;
                }
                b'-' | b'=' | b'#' | b':' | b'/' | b'\\' => {
                    if self.previous.is_none() || self.pending_bond.is_some() {
                        return Err(self.unexpected());
                    }
                    let order = match c {
                        b'=' => BondOrder::Double,
                        b'#' => BondOrder::Triple,
                        b':' => BondOrder::Aromatic,
                        _ => BondOrder::Single,
                    };
                    self.pending_bond = Some((order, self.pos));
                    self.pos += 1;
                }
                b'0'..=b'9' | b'%' => self.ring_closure()?,
                b'[' => self.bracket_atom()?,
                c if c.is_ascii_alphabetic() => self.organic_atom()?,
                _ => return Err(self.unexpected()),
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Molecule, SmilesError> {
        if let Some((_, position)) = self.pending_bond {
            return Err(SmilesError {
                position,
                kind: SmilesErrorKind::DanglingBond,
            });
        }
        if let Some(&(_, position)) = self.branches.last() {
            return Err(SmilesError {
                position,
                kind: SmilesErrorKind::UnclosedBranch,
            });
        }
        if let Some((&number, (_, position))) = self.rings.iter().min_by_key(|(_, (_, p))| *p) {
            return Err(SmilesError {
                position: *position,
                kind: SmilesErrorKind::UnclosedRing(number),
            });
        }
        self.add_hydrogens()?;
        Ok(self.molecule)
    }

    fn default_order(&self, a: usize, b: usize) -> BondOrder {
        let atoms = self.molecule.atoms();
        if atoms[a].aromatic && atoms[b].aromatic {
            BondOrder::Aromatic
        } else {
            BondOrder::Single
        }
    }

    fn push_atom(&mut self, atom: Atom, hydrogens: HydrogenCount) -> Result<(), SmilesError> {
        let index = self.molecule.add_atom(atom);
        self.hydrogens.push(hydrogens);
        if let Some(previous) = self.previous {
            let order = match self.pending_bond.take() {
                Some((order, _)) => order,
                None => self.default_order(previous, index),
            };
            self.molecule
                .add_bond(previous, index, order)
                .map_err(|e| self.error(e.into()))?;
        }
        self.previous = Some(index);
        Ok(())
    }

    fn organic_atom(&mut self) -> Result<(), SmilesError> {
        let start = self.pos;
        let rest = &self.input[start..];
        let (symbol, aromatic, len) = if rest.starts_with("Cl") {
            ("Cl", false, 2)
        } else if rest.starts_with("Br") {
            ("Br", false, 2)
        } else {
            match self.bytes[start] {
                b'B' => ("B", false, 1),
                b'C' => ("C", false, 1),
                b'N' => ("N", false, 1),
                b'O' => ("O", false, 1),
                b'P' => ("P", false, 1),
                b'S' => ("S", false, 1),
                b'F' => ("F", false, 1),
                b'I' => ("I", false, 1),
                b'b' => ("B", true, 1),
                b'c' => ("C", true, 1),
                b'n' => ("N", true, 1),
                b'o' => ("O", true, 1),
                b'p' => ("P", true, 1),
                b's' => ("S", true, 1),
                other => {
                    return Err(self.error(SmilesErrorKind::UnknownElement(
                        (other as char).to_string(),
                    )));
                }
            }
        };
        let element = lookup(symbol).ok_or_else(|| {
            self.error(SmilesErrorKind::UnknownElement(symbol.to_string()))
        })?;
        let mut atom = Atom::new(element);
        atom.aromatic = aromatic;
        self.pos += len;
        self.push_atom(atom, HydrogenCount::Implicit)
    }

    fn bracket_atom(&mut self) -> Result<(), SmilesError> {
        let open = self.pos;
        let Some(close_offset) = self.input[open..].find(']') else {
            return Err(self.error(SmilesErrorKind::InvalidBracketAtom(
                "missing ']'".to_string(),
            )));
        };
        let body = &self.input[open + 1..open + close_offset];
        let (atom, hydrogens) = parse_bracket_body(body).map_err(|msg| SmilesError {
            position: open,
            kind: msg,
        })?;
        self.pos = open + close_offset + 1;
        self.push_atom(atom, HydrogenCount::Explicit(hydrogens))
    }

    fn ring_closure(&mut self) -> Result<(), SmilesError> {
        let start = self.pos;
        let number = if self.bytes[start] == b'%' {
            let digits = self.input.get(start + 1..start + 3).unwrap_or("");
            if digits.len() != 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(self.unexpected());
            }
            self.pos += 3;
            digits.parse::<u16>().map_err(|_| self.unexpected())?
        } else {
            self.pos += 1;
            (self.bytes[start] - b'0') as u16
        };

        let Some(current) = self.previous else {
            return Err(SmilesError {
                position: start,
                kind: SmilesErrorKind::UnexpectedCharacter(self.bytes[start] as char),
            });
        };
        let closing_order = self.pending_bond.take().map(|(order, _)| order);

        match self.rings.remove(&number) {
            Some((opening, _)) => {
                let order = match (opening.order, closing_order) {
                    (Some(a), Some(b)) if a != b => {
                        return Err(SmilesError {
                            position: start,
                            kind: SmilesErrorKind::ConflictingRingBond(number),
                        });
                    }
                    (Some(order), _) | (None, Some(order)) => order,
                    (None, None) => self.default_order(opening.atom, current),
                };
                self.molecule
                    .add_bond(opening.atom, current, order)
                    .map_err(|e| SmilesError {
                        position: start,
                        kind: e.into(),
                    })?;
            }
            None => {
                self.rings.insert(
                    number,
                    (
                        RingOpening {
                            atom: current,
                            order: closing_order,
                        },
                        start,
                    ),
                );
            }
        }
        Ok(())
    }

    fn add_hydrogens(&mut self) -> Result<(), SmilesError> {
        let heavy_count = self.molecule.atom_count();
        for index in 0..heavy_count {
            let count = match self.hydrogens[index] {
                HydrogenCount::Explicit(n) => n,
                HydrogenCount::Implicit => self.implicit_hydrogens(index),
            };
            for _ in 0..count {
                let h = self.molecule.add_atom(Atom::hydrogen());
                self.molecule
                    .add_bond(index, h, BondOrder::Single)
                    .map_err(|e| self.error(e.into()))?;
            }
        }
        Ok(())
    }

    fn implicit_hydrogens(&self, index: usize) -> u8 {
        let atom = &self.molecule.atoms()[index];
        let z = atom.element.atomic_number;
        if atom.aromatic && (z == 8 || z == 16) {
            return 0;
        }
        let bonded: u8 = self
            .molecule
            .connections(index)
            .iter()
            .map(|&(_, b)| self.molecule.bonds()[b].order.valence())
            .sum();
        let used = bonded + u8::from(atom.aromatic);
        atom.element
            .valences
            .iter()
            .find(|&&v| v >= used)
            .map_or(0, |&v| v - used)
    }
}

fn lookup(symbol: &str) -> Option<&'static ElementData> {
    elements::element(symbol)
}

/// Parses the text between `[` and `]`: isotope, symbol, chirality,
/// hydrogen count, charge and atom class.
fn parse_bracket_body(body: &str) -> Result<(Atom, u8), SmilesErrorKind> {
    let invalid = || SmilesErrorKind::InvalidBracketAtom(body.to_string());
    let bytes = body.as_bytes();
    let mut pos = 0;

    let isotope_digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    let isotope = if isotope_digits > 0 {
        Some(body[..isotope_digits].parse::<u16>().map_err(|_| invalid())?)
    } else {
        None
    };
    pos += isotope_digits;

    let rest = &body[pos..];
    let (element, aromatic, len) = if rest.starts_with("se") || rest.starts_with("as") {
        let symbol = if rest.starts_with("se") { "Se" } else { "As" };
        (lookup(symbol), true, 2)
    } else {
        match bytes.get(pos) {
            Some(c @ (b'b' | b'c' | b'n' | b'o' | b'p' | b's')) => {
                let symbol = (c.to_ascii_uppercase() as char).to_string();
                (lookup(&symbol), true, 1)
            }
            Some(c) if c.is_ascii_uppercase() => {
                let two = rest.get(..2).filter(|s| s.as_bytes()[1].is_ascii_lowercase());
                match two.and_then(lookup) {
                    Some(e) => (Some(e), false, 2),
                    None => (lookup(&rest[..1]), false, 1),
                }
            }
            _ => return Err(invalid()),
        }
    };
    let element = element.ok_or_else(|| {
        SmilesErrorKind::UnknownElement(rest.chars().take(len).collect())
    })?;
    pos += len;

    // Chirality is read and discarded.
    let chirality_start = pos;
    while bytes.get(pos) == Some(&b'@') {
        pos += 1;
    }
    for class in ["TH", "AL", "SP", "TB", "OH"] {
        if pos > chirality_start && body[pos..].starts_with(class) {
            pos += 2;
            pos += bytes[pos..].iter().take_while(|b| b.is_ascii_digit()).count();
            break;
        }
    }

    let mut hydrogens = 0u8;
    if bytes.get(pos) == Some(&b'H') {
        pos += 1;
        hydrogens = match bytes.get(pos) {
            Some(d) if d.is_ascii_digit() => {
                pos += 1;
                d - b'0'
            }
            _ => 1,
        };
    }

    let mut charge: i8 = 0;
    if let Some(&(sign_byte @ (b'+' | b'-'))) = bytes.get(pos) {
        let sign: i8 = if sign_byte == b'+' { 1 } else { -1 };
        pos += 1;
        let digits = bytes[pos..].iter().take_while(|b| b.is_ascii_digit()).count();
        if digits > 0 {
            let magnitude = body[pos..pos + digits].parse::<i8>().map_err(|_| invalid())?;
            charge = sign * magnitude;
            pos += digits;
        } else {
            charge = sign;
            while bytes.get(pos) == Some(&sign_byte) {
                charge += sign;
                pos += 1;
            }
        }
    }

    if bytes.get(pos) == Some(&b':') {
        pos += 1;
        let digits = bytes[pos..].iter().take_while(|b| b.is_ascii_digit()).count();
        if digits == 0 {
            return Err(invalid());
        }
        pos += digits;
    }

    if pos != bytes.len() {
        return Err(invalid());
    }

    let mut atom = Atom::new(element);
    atom.aromatic = aromatic;
    atom.isotope = isotope;
    atom.formal_charge = charge;
    Ok((atom, hydrogens))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Hybridization;

    fn count(mol: &Molecule, symbol: &str) -> usize {
        mol.atoms().iter().filter(|a| a.symbol() == symbol).count()
    }

    #[test]
    fn parses_simple_chain_with_implicit_hydrogens() {
        let mol = parse_smiles("CCO").unwrap();
        assert_eq!(count(&mol, "C"), 2);
        assert_eq!(count(&mol, "O"), 1);
        assert_eq!(count(&mol, "H"), 6);
        assert_eq!(mol.bond_count(), 8);
        assert_eq!(mol.name(), "CCO");
    }

    #[test]
    fn branches_and_double_bonds() {
        // Acetic acid: C2H4O2.
        let mol = parse_smiles("CC(=O)O").unwrap();
        assert_eq!(count(&mol, "C"), 2);
        assert_eq!(count(&mol, "O"), 2);
        assert_eq!(count(&mol, "H"), 4);
        let carbonyl = mol.bond_between(1, 2).unwrap();
        assert_eq!(mol.bonds()[carbonyl].order, BondOrder::Double);
        assert_eq!(mol.bond_between(1, 3).map(|b| mol.bonds()[b].order), Some(BondOrder::Single));
    }

    #[test]
    fn aromatic_ring_closure_yields_benzene() {
        let mol = parse_smiles("c1ccccc1").unwrap();
        assert_eq!(count(&mol, "C"), 6);
        assert_eq!(count(&mol, "H"), 6);
        let ring_bonds: Vec<_> = mol.bonds().iter().filter(|b| b.in_ring).collect();
        assert_eq!(ring_bonds.len(), 6);
        assert!(ring_bonds.iter().all(|b| b.order == BondOrder::Aromatic));
        assert!(
            mol.atoms()
                .iter()
                .filter(|a| a.is_heavy())
                .all(|a| a.hybridization == Hybridization::Sp2)
        );
    }

    #[test]
    fn aromatic_heteroatoms_follow_hydrogen_rules() {
        let pyridine = parse_smiles("c1ccncc1").unwrap();
        assert_eq!(count(&pyridine, "H"), 5);
        let furan = parse_smiles("c1ccoc1").unwrap();
        assert_eq!(count(&furan, "H"), 4);
        let pyrrole = parse_smiles("c1cc[nH]c1").unwrap();
        assert_eq!(count(&pyrrole, "H"), 5);
    }

    #[test]
    fn fused_aromatic_carbons_carry_no_hydrogen() {
        let naphthalene = parse_smiles("c1ccc2ccccc2c1").unwrap();
        assert_eq!(count(&naphthalene, "C"), 10);
        assert_eq!(count(&naphthalene, "H"), 8);
    }

    #[test]
    fn bracket_atoms_set_charge_isotope_and_hydrogens() {
        let mol = parse_smiles("[13CH3][NH3+]").unwrap();
        assert_eq!(mol.atoms()[0].isotope, Some(13));
        assert_eq!(mol.atoms()[1].formal_charge, 1);
        assert_eq!(count(&mol, "H"), 6);
        assert_eq!(mol.total_charge(), 1);

        let mol = parse_smiles("[O-2]").unwrap();
        assert_eq!(mol.atoms()[0].formal_charge, -2);
        let mol = parse_smiles("[Fe++]").unwrap();
        assert_eq!(mol.atoms()[0].formal_charge, 2);
        let mol = parse_smiles("[Cl-]").unwrap();
        assert_eq!(mol.atoms()[0].symbol(), "Cl");
        assert_eq!(mol.atom_count(), 1);
    }

    #[test]
    fn chirality_and_directional_bonds_are_ignored() {
        let mol = parse_smiles("N[C@@H](C)C(=O)O").unwrap();
        assert_eq!(count(&mol, "H"), 7);
        let mol = parse_smiles("F/C=C/F").unwrap();
        assert_eq!(count(&mol, "H"), 2);
        let mol = parse_smiles("C[C@TH1H](O)F").unwrap();
        assert_eq!(count(&mol, "H"), 5);
    }

    #[test]
    fn two_letter_organic_atoms_and_percent_rings() {
        let mol = parse_smiles("ClCBr").unwrap();
        assert_eq!(count(&mol, "Cl"), 1);
        assert_eq!(count(&mol, "Br"), 1);
        assert_eq!(count(&mol, "H"), 2);

        let mol = parse_smiles("C%10CC%10").unwrap();
        assert_eq!(mol.bonds().iter().filter(|b| b.in_ring).count(), 3);
    }

    #[test]
    fn ring_closure_bond_symbol_is_honored() {
        let mol = parse_smiles("C=1CCCCC1").unwrap();
        let closure = mol.bond_between(0, 5).unwrap();
        assert_eq!(mol.bonds()[closure].order, BondOrder::Double);
        assert_eq!(
            parse_smiles("C=1CCCCC#1").unwrap_err().kind,
            SmilesErrorKind::ConflictingRingBond(1)
        );
    }

    #[test]
    fn bond_joining_aromatic_rings_is_single() {
        let biphenyl = parse_smiles("c1ccccc1c1ccccc1").unwrap();
        let link = biphenyl.bond_between(5, 6).unwrap();
        assert_eq!(biphenyl.bonds()[link].order, BondOrder::Single);
        assert!(!biphenyl.bonds()[link].in_ring);
        assert_eq!(count(&biphenyl, "H"), 10);
    }

    #[test]
    fn dot_separates_fragments() {
        let mol = parse_smiles("[Na+].[Cl-]").unwrap();
        assert_eq!(mol.atom_count(), 2);
        assert_eq!(mol.bond_count(), 0);
        assert_eq!(mol.total_charge(), 0);
    }

    #[test]
    fn hypervalent_sulfur_uses_next_valence() {
        let mol = parse_smiles("CS(=O)(=O)C").unwrap();
        assert_eq!(count(&mol, "H"), 6);
        let sulfur = 1;
        assert_eq!(mol.degree(sulfur), 4);
    }

    #[test]
    fn reports_errors_with_positions() {
        let err = parse_smiles("").unwrap_err();
        assert_eq!(err.kind, SmilesErrorKind::EmptyInput);

        let err = parse_smiles("CC(C").unwrap_err();
        assert_eq!(err, SmilesError { position: 2, kind: SmilesErrorKind::UnclosedBranch });

        let err = parse_smiles("CC)C").unwrap_err();
        assert_eq!(err, SmilesError { position: 2, kind: SmilesErrorKind::UnmatchedParenthesis });

        let err = parse_smiles("C1CC").unwrap_err();
        assert_eq!(err, SmilesError { position: 1, kind: SmilesErrorKind::UnclosedRing(1) });

        let err = parse_smiles("CC=").unwrap_err();
        assert_eq!(err, SmilesError { position: 2, kind: SmilesErrorKind::DanglingBond });

        let err = parse_smiles("C?C").unwrap_err();
        assert_eq!(err, SmilesError { position: 1, kind: SmilesErrorKind::UnexpectedCharacter('?') });

        let err = parse_smiles("CX").unwrap_err();
        assert_eq!(err.kind, SmilesErrorKind::UnknownElement("X".to_string()));

        let err = parse_smiles("C[Xx]").unwrap_err();
        assert_eq!(err.position, 1);

        let err = parse_smiles("C[CH3").unwrap_err();
        assert!(matches!(err.kind, SmilesErrorKind::InvalidBracketAtom(_)));

        assert!(parse_smiles("C11").is_err());
    }
}
