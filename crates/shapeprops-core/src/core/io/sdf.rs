use crate::core::elements;
use crate::core::io::traits::MolecularFile;
use crate::core::models::atom::Atom;
use crate::core::models::conformer::Conformer;
use crate::core::models::molecule::{Molecule, MoleculeError};
use crate::core::models::topology::BondOrder;
use nalgebra::Point3;
use std::fmt;
use std::io::{self, BufRead, Write};
use thiserror::Error;

const ENERGY_TAG: &str = "ENERGY";
const MAX_V2000_ENTRIES: usize = 999;

#[derive(Debug, Clone, PartialEq)]
pub struct SdfMetadata {
    /// Second header line of every record (program / timestamp line).
    pub program_line: String,
    /// Third header line of every record.
    pub comment: String,
}

impl Default for SdfMetadata {
    fn default() -> Self {
        Self {
            program_line: "  shapeprops      3D".to_string(),
            comment: String::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SdfError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: SdfParseErrorKind },
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error)]
pub enum SdfParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Unknown element symbol '{0}'")]
    UnknownElement(String),
    #[error("Unsupported connection table version '{0}' (only V2000 is supported)")]
    UnsupportedVersion(String),
    #[error("Unsupported bond type {0}")]
    UnsupportedBondType(u8),
    #[error("Invalid property line")]
    InvalidPropertyLine,
    #[error("Unexpected end of record")]
    UnexpectedEnd,
    #[error("{0}")]
    Graph(#[from] MoleculeError),
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("").trim()
}

fn parse_int<T: std::str::FromStr>(
    line: &str,
    start: usize,
    end: usize,
    line_num: usize,
) -> Result<T, SdfError> {
    let value = slice_and_trim(line, start, end);
    value.parse::<T>().map_err(|_| SdfError::Parse {
        line: line_num,
        kind: SdfParseErrorKind::InvalidInt {
            columns: format!("{}-{}", start + 1, end),
            value: value.to_string(),
        },
    })
}

fn parse_float(line: &str, start: usize, end: usize, line_num: usize) -> Result<f64, SdfError> {
    let value = slice_and_trim(line, start, end);
    value.parse::<f64>().map_err(|_| SdfError::Parse {
        line: line_num,
        kind: SdfParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, end),
            value: value.to_string(),
        },
    })
}

/// Converts an atom-block charge code to a formal charge.
fn charge_from_code(code: u8) -> i8 {
    match code {
        1 => 3,
        2 => 2,
        3 => 1,
        5 => -1,
        6 => -2,
        7 => -3,
        _ => 0,
    }
}

fn code_from_charge(charge: i8) -> u8 {
    match charge {
        3 => 1,
        2 => 2,
        1 => 3,
        -1 => 5,
        -2 => 6,
        -3 => 7,
        _ => 0,
    }
}

/// One parsed record of an SD file: a full molecule with a single conformer.
struct Record {
    name: String,
    program_line: String,
    comment: String,
    molecule: Molecule,
    positions: Vec<Point3<f64>>,
    energy: Option<f64>,
}

/// Line reader that keeps track of 1-based line numbers.
struct Lines<'a, R: BufRead> {
    reader: &'a mut R,
    line_num: usize,
}

impl<R: BufRead> Lines<'_, R> {
    fn next_line(&mut self) -> Result<Option<String>, SdfError> {
        let mut buf = String::new();
        if self.reader.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        self.line_num += 1;
        let trimmed = buf.trim_end_matches(['\n', '\r']).to_string();
        Ok(Some(trimmed))
    }

    fn require_line(&mut self) -> Result<String, SdfError> {
        self.next_line()?.ok_or(SdfError::Parse {
            line: self.line_num + 1,
            kind: SdfParseErrorKind::UnexpectedEnd,
        })
    }
}

fn read_record<R: BufRead>(lines: &mut Lines<'_, R>) -> Result<Option<Record>, SdfError> {
    let Some(name) = lines.next_line()? else {
        return Ok(None);
    };
    let program_line = match lines.next_line()? {
        Some(line) => line,
        // Trailing blank line after the last `$$$$`.
        None if name.trim().is_empty() => return Ok(None),
        None => {
            return Err(SdfError::Parse {
                line: lines.line_num + 1,
                kind: SdfParseErrorKind::UnexpectedEnd,
            });
        }
    };
    let comment = lines.require_line()?;

    let counts = lines.require_line()?;
    let counts_line = lines.line_num;
    let version = slice_and_trim(&counts, 33, 39);
    if !version.is_empty() && version != "V2000" {
        return Err(SdfError::Parse {
            line: counts_line,
            kind: SdfParseErrorKind::UnsupportedVersion(version.to_string()),
        });
    }
    let atom_count: usize = parse_int(&counts, 0, 3, counts_line)?;
    let bond_count: usize = parse_int(&counts, 3, 6, counts_line)?;

    let mut molecule = Molecule::with_name(name.trim());
    let mut positions = Vec::with_capacity(atom_count);
    for _ in 0..atom_count {
        let line = lines.require_line()?;
        let line_num = lines.line_num;
        let x = parse_float(&line, 0, 10, line_num)?;
        let y = parse_float(&line, 10, 20, line_num)?;
        let z = parse_float(&line, 20, 30, line_num)?;
        let symbol = slice_and_trim(&line, 31, 34);
        let element = elements::element(symbol).ok_or_else(|| SdfError::Parse {
            line: line_num,
            kind: SdfParseErrorKind::UnknownElement(symbol.to_string()),
        })?;
        let charge_code: u8 = if slice_and_trim(&line, 36, 39).is_empty() {
            0
        } else {
            parse_int(&line, 36, 39, line_num)?
        };
        let mut atom = Atom::new(element);
        atom.formal_charge = charge_from_code(charge_code);
        molecule.add_atom(atom);
        positions.push(Point3::new(x, y, z));
    }

    for _ in 0..bond_count {
        let line = lines.require_line()?;
        let line_num = lines.line_num;
        let a1: usize = parse_int(&line, 0, 3, line_num)?;
        let a2: usize = parse_int(&line, 3, 6, line_num)?;
        let code: u8 = parse_int(&line, 6, 9, line_num)?;
        let order = BondOrder::from_mdl_code(code).ok_or(SdfError::Parse {
            line: line_num,
            kind: SdfParseErrorKind::UnsupportedBondType(code),
        })?;
        let graph_error = |e: MoleculeError| SdfError::Parse {
            line: line_num,
            kind: e.into(),
        };
        let (i, j) = (
            a1.checked_sub(1).ok_or_else(|| {
                graph_error(MoleculeError::AtomIndexOutOfRange {
                    index: a1,
                    count: atom_count,
                })
            })?,
            a2.checked_sub(1).ok_or_else(|| {
                graph_error(MoleculeError::AtomIndexOutOfRange {
                    index: a2,
                    count: atom_count,
                })
            })?,
        );
        molecule.add_bond(i, j, order).map_err(graph_error)?;
        if order == BondOrder::Aromatic {
            for index in [i, j] {
                if let Some(atom) = molecule.atom_mut(index) {
                    atom.aromatic = true;
                }
            }
        }
    }

    let mut charges_reset = false;
    loop {
        let line = lines.require_line()?;
        let line_num = lines.line_num;
        if line.starts_with("M  END") {
            break;
        }
        if line.starts_with("M  CHG") || line.starts_with("M  ISO") {
            let entries = parse_property_pairs(&line, line_num)?;
            let is_charge = line.starts_with("M  CHG");
            if is_charge && !charges_reset {
                // A CHG property supersedes every atom-block charge.
                for index in 0..molecule.atom_count() {
                    if let Some(atom) = molecule.atom_mut(index) {
                        atom.formal_charge = 0;
                    }
                }
                charges_reset = true;
            }
            for (atom_number, value) in entries {
                let atom = atom_number
                    .checked_sub(1)
                    .and_then(|i| molecule.atom_mut(i))
                    .ok_or(SdfError::Parse {
                        line: line_num,
                        kind: SdfParseErrorKind::InvalidPropertyLine,
                    })?;
                if is_charge {
                    atom.formal_charge = i8::try_from(value).map_err(|_| SdfError::Parse {
                        line: line_num,
                        kind: SdfParseErrorKind::InvalidPropertyLine,
                    })?;
                } else {
                    atom.isotope = u16::try_from(value).ok();
                }
            }
        }
    }

    let mut energy = None;
    let mut current_tag: Option<String> = None;
    while let Some(line) = lines.next_line()? {
        if line.starts_with("$$$$") {
            break;
        }
        if line.starts_with('>') {
            current_tag = line
                .find('<')
                .zip(line.rfind('>'))
                .filter(|(open, close)| close > open)
                .map(|(open, close)| line[open + 1..close].to_string());
            continue;
        }
        if line.trim().is_empty() {
            current_tag = None;
            continue;
        }
        if current_tag.as_deref() == Some(ENERGY_TAG) {
            energy = Some(line.trim().parse::<f64>().map_err(|_| SdfError::Parse {
                line: lines.line_num,
                kind: SdfParseErrorKind::InvalidFloat {
                    columns: ENERGY_TAG.to_string(),
                    value: line.trim().to_string(),
                },
            })?);
        }
    }

    molecule.perceive();
    Ok(Some(Record {
        name,
        program_line,
        comment,
        molecule,
        positions,
        energy,
    }))
}

/// Parses `M  CHG`/`M  ISO` lines: `M  XXXnn8 aaa vvv ...`.
fn parse_property_pairs(line: &str, line_num: usize) -> Result<Vec<(usize, i32)>, SdfError> {
    let invalid = || SdfError::Parse {
        line: line_num,
        kind: SdfParseErrorKind::InvalidPropertyLine,
    };
    let mut fields = line.get(6..).ok_or_else(invalid)?.split_whitespace();
    let count: usize = fields
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(invalid)?;
    let mut pairs = Vec::with_capacity(count);
    for _ in 0..count {
        let atom = fields.next().and_then(|s| s.parse().ok()).ok_or_else(invalid)?;
        let value = fields.next().and_then(|s| s.parse().ok()).ok_or_else(invalid)?;
        pairs.push((atom, value));
    }
    Ok(pairs)
}

fn same_topology(a: &Molecule, b: &Molecule) -> bool {
    a.atom_count() == b.atom_count()
        && a.bond_count() == b.bond_count()
        && a
            .atoms()
            .iter()
            .zip(b.atoms())
            .all(|(x, y)| x.element.atomic_number == y.element.atomic_number)
        && a.bonds().iter().zip(b.bonds()).all(|(x, y)| {
            x.order == y.order
                && ((x.atom1 == y.atom1 && x.atom2 == y.atom2)
                    || (x.atom1 == y.atom2 && x.atom2 == y.atom1))
        })
}

/// MDL SD files: one record per conformer of a single molecule.
pub struct SdfFile;

impl MolecularFile for SdfFile {
    type Metadata = SdfMetadata;
    type Error = SdfError;

    /// Reads every record of the file. The first record defines the molecule;
    /// each record (the first included) contributes one conformer and must
    /// share the first record's connection table.
    fn read_from(reader: &mut impl BufRead) -> Result<(Molecule, Self::Metadata), Self::Error> {
        let mut lines = Lines {
            reader,
            line_num: 0,
        };

        let first = read_record(&mut lines)?
            .ok_or_else(|| SdfError::MissingRecord("connection table".to_string()))?;
        let metadata = SdfMetadata {
            program_line: first.program_line,
            comment: first.comment,
        };
        let mut molecule = first.molecule;
        molecule.set_name(first.name.trim());
        let mut conformers = vec![conformer_of(first.positions, first.energy)];

        while let Some(record) = read_record(&mut lines)? {
            if !same_topology(&molecule, &record.molecule) {
                return Err(SdfError::Inconsistency(format!(
                    "record ending on line {} does not match the first record's connection table",
                    lines.line_num
                )));
            }
            conformers.push(conformer_of(record.positions, record.energy));
        }

        molecule
            .set_conformers(conformers)
            .map_err(|e| SdfError::Inconsistency(e.to_string()))?;
        Ok((molecule, metadata))
    }

    fn write_to(
        molecule: &Molecule,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        if molecule.atom_count() > MAX_V2000_ENTRIES || molecule.bond_count() > MAX_V2000_ENTRIES {
            return Err(SdfError::Inconsistency(format!(
                "V2000 connection tables hold at most {} atoms and bonds",
                MAX_V2000_ENTRIES
            )));
        }
        if molecule.conformers().is_empty() {
            let origin = vec![Point3::origin(); molecule.atom_count()];
            write_record(molecule, metadata, &origin, None, writer)?;
        }
        for conformer in molecule.conformers() {
            write_record(
                molecule,
                metadata,
                conformer.positions(),
                conformer.energy(),
                writer,
            )?;
        }
        Ok(())
    }

    fn write_molecule_to(
        molecule: &Molecule,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        Self::write_to(molecule, &SdfMetadata::default(), writer)
    }
}

fn conformer_of(positions: Vec<Point3<f64>>, energy: Option<f64>) -> Conformer {
    let conformer = Conformer::new(positions);
    match energy {
        Some(e) => conformer.with_energy(e),
        None => conformer,
    }
}

fn write_connection_table(
    molecule: &Molecule,
    metadata: &SdfMetadata,
    positions: &[Point3<f64>],
    writer: &mut impl Write,
) -> io::Result<()> {
    writeln!(writer, "{}", molecule.name())?;
    writeln!(writer, "{}", metadata.program_line)?;
    writeln!(writer, "{}", metadata.comment)?;
    writeln!(
        writer,
        "{:>3}{:>3}  0  0  0  0  0  0  0  0999 V2000",
        molecule.atom_count(),
        molecule.bond_count()
    )?;
    for (atom, p) in molecule.atoms().iter().zip(positions) {
        writeln!(
            writer,
            "{:>10.4}{:>10.4}{:>10.4} {:<3} 0{:>3}  0  0  0  0  0  0  0  0  0  0",
            p.x,
            p.y,
            p.z,
            atom.symbol(),
            code_from_charge(atom.formal_charge)
        )?;
    }
    for bond in molecule.bonds() {
        writeln!(
            writer,
            "{:>3}{:>3}{:>3}  0",
            bond.atom1 + 1,
            bond.atom2 + 1,
            bond.order.mdl_code()
        )?;
    }

    let charged: Vec<(usize, i32)> = molecule
        .atoms()
        .iter()
        .enumerate()
        .filter(|(_, a)| a.formal_charge != 0)
        .map(|(i, a)| (i + 1, a.formal_charge as i32))
        .collect();
    write_property_lines(writer, "CHG", &charged)?;
    let isotopes: Vec<(usize, i32)> = molecule
        .atoms()
        .iter()
        .enumerate()
        .filter_map(|(i, a)| a.isotope.map(|iso| (i + 1, iso as i32)))
        .collect();
    write_property_lines(writer, "ISO", &isotopes)?;
    writeln!(writer, "M  END")
}

fn write_property_lines(
    writer: &mut impl Write,
    tag: &str,
    entries: &[(usize, i32)],
) -> io::Result<()> {
    for chunk in entries.chunks(8) {
        write!(writer, "M  {}{:>3}", tag, chunk.len())?;
        for (atom, value) in chunk {
            write!(writer, " {:>3} {:>3}", atom, value)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

fn write_record(
    molecule: &Molecule,
    metadata: &SdfMetadata,
    positions: &[Point3<f64>],
    energy: Option<f64>,
    writer: &mut impl Write,
) -> io::Result<()> {
    write_connection_table(molecule, metadata, positions, writer)?;
    if let Some(energy) = energy {
        writeln!(writer, "> <{}>", ENERGY_TAG)?;
        writeln!(writer, "{:.6}", energy)?;
        writeln!(writer)?;
    }
    writeln!(writer, "$$$$")
}

/// A single-record MDL V2000 mol block: bond graph plus one coordinate set.
///
/// This is the hand-off format between a geometry provider and a conformer
/// generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureBlock(String);

impl StructureBlock {
    /// Wraps mol block text without validating it.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Serializes the molecule's first conformer (all-zero coordinates if it
    /// has none).
    pub fn from_molecule(molecule: &Molecule) -> Result<Self, SdfError> {
        if molecule.atom_count() > MAX_V2000_ENTRIES || molecule.bond_count() > MAX_V2000_ENTRIES {
            return Err(SdfError::Inconsistency(format!(
                "V2000 connection tables hold at most {} atoms and bonds",
                MAX_V2000_ENTRIES
            )));
        }
        let origin;
        let positions = match molecule.conformer(0) {
            Some(conformer) => conformer.positions(),
            None => {
                origin = vec![Point3::origin(); molecule.atom_count()];
                &origin[..]
            }
        };
        let mut buf = Vec::new();
        write_connection_table(molecule, &SdfMetadata::default(), positions, &mut buf)?;
        let text = String::from_utf8(buf)
            .map_err(|e| SdfError::Inconsistency(format!("mol block is not UTF-8: {e}")))?;
        Ok(Self(text))
    }

    /// Parses the block into a molecule with exactly one conformer.
    pub fn to_molecule(&self) -> Result<Molecule, SdfError> {
        let mut reader = self.0.as_bytes();
        let (molecule, _) = SdfFile::read_from(&mut reader)?;
        Ok(molecule)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for StructureBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::smiles::parse_smiles;
    use std::io::Cursor;
    use tempfile::NamedTempFile;

    const WATER: &str = "water
  hand-written

  3  2  0  0  0  0  0  0  0  0999 V2000
    0.0000    0.0000    0.1173 O   0  0  0  0  0  0  0  0  0  0  0  0
    0.0000    0.7572   -0.4692 H   0  0  0  0  0  0  0  0  0  0  0  0
    0.0000   -0.7572   -0.4692 H   0  0  0  0  0  0  0  0  0  0  0  0
  1  2  1  0
  1  3  1  0
M  END
> <ENERGY>
1.250000

$$$$
";

    fn with_coordinates(smiles: &str) -> Molecule {
        let mut mol = parse_smiles(smiles).unwrap();
        let positions = (0..mol.atom_count())
            .map(|i| Point3::new(i as f64, 0.5 * i as f64, -0.25 * i as f64))
            .collect();
        mol.add_conformer(Conformer::new(positions).with_energy(-2.0))
            .unwrap();
        mol
    }

    #[test]
    fn reads_single_record_with_energy() {
        let (mol, metadata) = SdfFile::read_from(&mut Cursor::new(WATER)).unwrap();
        assert_eq!(mol.name(), "water");
        assert_eq!(metadata.program_line, "  hand-written");
        assert_eq!(mol.atom_count(), 3);
        assert_eq!(mol.bond_count(), 2);
        assert_eq!(mol.conformer_count(), 1);
        let conformer = mol.conformer(0).unwrap();
        assert_eq!(conformer.energy(), Some(1.25));
        assert!((conformer.positions()[1].y - 0.7572).abs() < 1e-9);
    }

    #[test]
    fn multiple_records_become_conformers() {
        let text = format!("{WATER}{}", WATER.replace("0.1173", "0.2000").replace("1.250000", "0.500000"));
        let (mol, _) = SdfFile::read_from(&mut Cursor::new(text)).unwrap();
        assert_eq!(mol.conformer_count(), 2);
        assert_eq!(mol.conformer(1).unwrap().energy(), Some(0.5));
        assert!((mol.conformer(1).unwrap().positions()[0].z - 0.2).abs() < 1e-9);
    }

    #[test]
    fn mismatched_records_are_rejected() {
        let other = WATER.replace(" O   0", " S   0");
        let text = format!("{WATER}{other}");
        let err = SdfFile::read_from(&mut Cursor::new(text)).unwrap_err();
        assert!(matches!(err, SdfError::Inconsistency(_)));
    }

    #[test]
    fn empty_input_is_missing_record() {
        let err = SdfFile::read_from(&mut Cursor::new("")).unwrap_err();
        assert!(matches!(err, SdfError::MissingRecord(_)));
    }

    #[test]
    fn reports_line_of_bad_coordinate() {
        let text = WATER.replace("0.7572", "0.7x72");
        let err = SdfFile::read_from(&mut Cursor::new(text)).unwrap_err();
        match err {
            SdfError::Parse { line, kind } => {
                assert_eq!(line, 6);
                assert!(matches!(kind, SdfParseErrorKind::InvalidFloat { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_v3000_tables() {
        let text = WATER.replace("V2000", "V3000");
        let err = SdfFile::read_from(&mut Cursor::new(text)).unwrap_err();
        assert!(matches!(
            err,
            SdfError::Parse {
                line: 4,
                kind: SdfParseErrorKind::UnsupportedVersion(_)
            }
        ));
    }

    #[test]
    fn write_then_read_preserves_graph_charges_and_energy() {
        let original = with_coordinates("[13CH3]C(=O)[O-]");
        let mut buf = Vec::new();
        SdfFile::write_molecule_to(&original, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("M  CHG  1"));
        assert!(text.contains("M  ISO  1   1  13"));
        assert!(text.contains("> <ENERGY>"));

        let (read, _) = SdfFile::read_from(&mut Cursor::new(text)).unwrap();
        assert!(same_topology(&original, &read));
        assert_eq!(read.total_charge(), -1);
        assert_eq!(read.atoms()[0].isotope, Some(13));
        assert_eq!(read.conformer(0).unwrap().energy(), Some(-2.0));
        let expected = original.conformer(0).unwrap().positions();
        for (a, b) in expected.iter().zip(read.conformer(0).unwrap().positions()) {
            assert!((a - b).norm() < 1e-4);
        }
    }

    #[test]
    fn aromatic_bonds_restore_aromatic_atoms() {
        let benzene = with_coordinates("c1ccccc1");
        let block = StructureBlock::from_molecule(&benzene).unwrap();
        assert!(block.as_str().contains("V2000"));
        assert!(!block.as_str().contains("$$$$"));
        let mol = block.to_molecule().unwrap();
        assert_eq!(mol.conformer_count(), 1);
        assert_eq!(mol.atoms().iter().filter(|a| a.aromatic).count(), 6);
        assert_eq!(mol.bonds().iter().filter(|b| b.in_ring).count(), 6);
    }

    #[test]
    fn path_helpers_round_trip_through_a_file() {
        let mol = with_coordinates("CCO");
        let file = NamedTempFile::new().unwrap();
        SdfFile::write_molecule_to_path(&mol, file.path()).unwrap();
        let (read, metadata) = SdfFile::read_from_path(file.path()).unwrap();
        assert_eq!(read.name(), "CCO");
        assert_eq!(read.atom_count(), mol.atom_count());
        assert_eq!(metadata, SdfMetadata::default());
    }

    #[test]
    fn molecule_without_conformers_writes_origin_coordinates() {
        let mol = parse_smiles("C").unwrap();
        let mut buf = Vec::new();
        SdfFile::write_molecule_to(&mol, &mut buf).unwrap();
        let (read, _) = SdfFile::read_from(&mut Cursor::new(buf)).unwrap();
        assert_eq!(read.conformer_count(), 1);
        assert!(
            read.conformer(0)
                .unwrap()
                .positions()
                .iter()
                .all(|p| p.coords.norm() == 0.0)
        );
    }
}
