use crate::cli::OutputFormat;
use crate::error::{CliError, Result};
use serde::Serialize;
use shapeprops::workflows::properties::PropertyRecord;
use std::fmt::Write;

/// A descriptor record labelled with the SMILES it was computed from.
#[derive(Serialize, Debug)]
pub struct Entry<'a> {
    pub smiles: &'a str,
    #[serde(flatten)]
    pub record: &'a PropertyRecord,
}

pub fn render(entry: &Entry<'_>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(entry)),
        OutputFormat::Json => serde_json::to_string_pretty(entry)
            .map(|mut s| {
                s.push('\n');
                s
            })
            .map_err(|e| CliError::Other(e.into())),
        OutputFormat::Toml => toml::to_string(entry).map_err(|e| CliError::Other(e.into())),
    }
}

fn render_text(entry: &Entry<'_>) -> String {
    let width = entry.smiles.len().max("SMILES".len());
    let r = entry.record;

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<width$}  {:<14} {:>10} {:>4} {:>8} {:>8}",
        "SMILES", "FORM", "MOLWT", "RB", "GLOB", "PBF"
    );
    let _ = writeln!(
        out,
        "{:<width$}  {:<14} {:>10.4} {:>4} {:>8.4} {:>8.4}",
        entry.smiles, r.form, r.molwt, r.rb, r.glob, r.pbf
    );
    out
}
