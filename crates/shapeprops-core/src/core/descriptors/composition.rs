use crate::core::models::molecule::Molecule;
use std::collections::BTreeMap;

/// Molecular formula in Hill order, followed by the net charge as repeated
/// `+` or `-` signs.
///
/// Carbon comes first and hydrogen second when carbon is present; all other
/// elements (and hydrogen, for carbon-free molecules) follow alphabetically.
/// Counts of one are omitted.
pub fn molecular_formula(molecule: &Molecule) -> String {
    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for atom in molecule.atoms() {
        *counts.entry(atom.symbol()).or_default() += 1;
    }

    let mut formula = String::new();
    let mut push = |symbol: &str, count: usize| {
        formula.push_str(symbol);
        if count > 1 {
            formula.push_str(&count.to_string());
        }
    };

    if let Some(carbon) = counts.remove("C") {
        push("C", carbon);
        if let Some(hydrogen) = counts.remove("H") {
            push("H", hydrogen);
        }
    }
    for (symbol, count) in counts {
        push(symbol, count);
    }

    let charge = molecule.total_charge();
    let sign = if charge > 0 { '+' } else { '-' };
    formula.extend(std::iter::repeat_n(sign, charge.unsigned_abs() as usize));
    formula
}

/// Sum of the standard atomic weights of all atoms, hydrogens included (g/mol).
pub fn molecular_weight(molecule: &Molecule) -> f64 {
    molecule.atoms().iter().map(|a| a.element.mass).sum()
}
