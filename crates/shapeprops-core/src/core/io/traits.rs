use crate::core::models::molecule::Molecule;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading and writing molecular file formats.
///
/// Implementors handle format-specific parsing and serialization; the
/// path-based helpers are provided on top of the reader/writer methods.
pub trait MolecularFile {
    /// The type of metadata associated with the file format.
    type Metadata;

    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads a molecule, including all of its conformers, from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead) -> Result<(Molecule, Self::Metadata), Self::Error>;

    /// Writes a molecule and metadata to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails or I/O operations encounter issues.
    fn write_to(
        molecule: &Molecule,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error>;

    /// Writes a molecule to a writer with default metadata.
    fn write_molecule_to(molecule: &Molecule, writer: &mut impl Write)
    -> Result<(), Self::Error>;

    /// Reads a molecule from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<(Molecule, Self::Metadata), Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Writes a molecule and metadata to a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(
        molecule: &Molecule,
        metadata: &Self::Metadata,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(molecule, metadata, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Writes a molecule to a file path with default metadata.
    fn write_molecule_to_path<P: AsRef<Path>>(
        molecule: &Molecule,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_molecule_to(molecule, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
