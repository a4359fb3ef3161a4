use super::params::ForceFieldParams;
use super::potentials;
use super::term::EnergyTerm;
use crate::core::models::atom::{Atom, Hybridization};
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;
use itertools::Itertools;
use nalgebra::{Point3, Vector3};

const MIN_DISTANCE: f64 = 1e-12;

#[derive(Debug, Clone, Copy)]
struct BondTerm {
    i: usize,
    j: usize,
    r0: f64,
}

#[derive(Debug, Clone, Copy)]
struct AngleTerm {
    i: usize,
    center: usize,
    k: usize,
    cos0: f64,
}

/// Four atoms that should be coplanar: V = (p1 − p0) · ((p2 − p0) × (p3 − p0)).
#[derive(Debug, Clone, Copy)]
struct PlanarityTerm {
    atoms: [usize; 4],
}

#[derive(Debug, Clone, Copy)]
struct PairTerm {
    i: usize,
    j: usize,
    r0: f64,
}

/// Covalent radius of an atom, with carbon depending on its hybridization.
pub fn covalent_radius(atom: &Atom, params: &ForceFieldParams) -> f64 {
    if atom.element.is_carbon() {
        match atom.hybridization {
            Hybridization::Sp3 | Hybridization::Hypervalent => params.carbon_radii[0],
            Hybridization::Sp2 => params.carbon_radii[1],
            Hybridization::Sp => params.carbon_radii[2],
        }
    } else {
        atom.element.covalent_radius
    }
}

/// Equilibrium length of a bond: r1 + r2 − λ(r1 + r2) ln(n), n being the
/// bond order (1.5 for aromatic bonds).
pub fn ideal_bond_length(
    molecule: &Molecule,
    bond_index: usize,
    params: &ForceFieldParams,
) -> Option<f64> {
    let bond = molecule.bond(bond_index)?;
    let atoms = molecule.atoms();
    let sum =
        covalent_radius(&atoms[bond.atom1], params) + covalent_radius(&atoms[bond.atom2], params);
    Some(sum - params.bond_order_correction * sum * bond.order.as_f64().ln())
}

/// Cosine of the ideal bond angle at a center; `None` for hypervalent centers.
pub fn ideal_angle_cosine(hybridization: Hybridization) -> Option<f64> {
    hybridization
        .ideal_angle_degrees()
        .map(|deg| deg.to_radians().cos())
}

/// Onset distance of the repulsion between two atoms.
pub fn repulsion_onset(a: &Atom, b: &Atom, params: &ForceFieldParams) -> f64 {
    params.repulsion_scale * (a.element.vdw_radius + b.element.vdw_radius)
}

/// Energy function of one molecule: the term lists are fixed at construction,
/// positions are supplied per evaluation.
#[derive(Debug, Clone)]
pub struct ForceField {
    params: ForceFieldParams,
    atom_count: usize,
    bonds: Vec<BondTerm>,
    angles: Vec<AngleTerm>,
    planes: Vec<PlanarityTerm>,
    pairs: Vec<PairTerm>,
}

impl ForceField {
    /// Builds the term lists from a perceived molecule (ring flags and
    /// hybridization must be set).
    pub fn new(molecule: &Molecule, params: &ForceFieldParams) -> Self {
        let atoms = molecule.atoms();

        let bonds = (0..molecule.bond_count())
            .filter_map(|b| {
                let bond = molecule.bond(b)?;
                Some(BondTerm {
                    i: bond.atom1,
                    j: bond.atom2,
                    r0: ideal_bond_length(molecule, b, params)?,
                })
            })
            .collect();

        let mut angles = Vec::new();
        for (center, atom) in atoms.iter().enumerate() {
            let Some(cos0) = ideal_angle_cosine(atom.hybridization) else {
                continue;
            };
            let neighbors: Vec<usize> = molecule.neighbors(center).collect();
            for (i, k) in neighbors.iter().copied().tuple_combinations() {
                angles.push(AngleTerm { i, center, k, cos0 });
            }
        }

        let mut planes = Vec::new();
        for (center, atom) in atoms.iter().enumerate() {
            if atom.hybridization == Hybridization::Sp2 && molecule.degree(center) == 3 {
                let n: Vec<usize> = molecule.neighbors(center).collect();
                planes.push(PlanarityTerm {
                    atoms: [center, n[0], n[1], n[2]],
                });
            }
        }
        for bond in molecule.bonds() {
            if !matches!(bond.order, BondOrder::Double | BondOrder::Aromatic) {
                continue;
            }
            let (i, j) = (bond.atom1, bond.atom2);
            for a in molecule.neighbors(i).filter(|&a| a != j) {
                for d in molecule.neighbors(j).filter(|&d| d != i) {
                    planes.push(PlanarityTerm {
                        atoms: [a, i, j, d],
                    });
                }
            }
        }

        let topology = molecule.topological_distances();
        let mut pairs = Vec::new();
        for i in 0..atoms.len() {
            for j in (i + 1)..atoms.len() {
                let separation = topology[i][j];
                let include = separation >= 3
                    || (separation == 2
                        && molecule.neighbors(i).any(|c| {
                            atoms[c].hybridization == Hybridization::Hypervalent
                                && molecule.bond_between(c, j).is_some()
                        }));
                if include {
                    pairs.push(PairTerm {
                        i,
                        j,
                        r0: repulsion_onset(&atoms[i], &atoms[j], params),
                    });
                }
            }
        }

        Self {
            params: params.clone(),
            atom_count: atoms.len(),
            bonds,
            angles,
            planes,
            pairs,
        }
    }

    pub fn atom_count(&self) -> usize {
        self.atom_count
    }

    pub fn params(&self) -> &ForceFieldParams {
        &self.params
    }

    pub fn energy(&self, positions: &[Point3<f64>]) -> EnergyTerm {
        self.evaluate(positions, None)
    }

    /// Evaluates the energy and overwrites `gradient` with dE/dx for every atom.
    pub fn energy_and_gradient(
        &self,
        positions: &[Point3<f64>],
        gradient: &mut [Vector3<f64>],
    ) -> EnergyTerm {
        gradient.iter_mut().for_each(|g| *g = Vector3::zeros());
        self.evaluate(positions, Some(gradient))
    }

    fn evaluate(
        &self,
        positions: &[Point3<f64>],
        mut gradient: Option<&mut [Vector3<f64>]>,
    ) -> EnergyTerm {
        let p = &self.params;
        let mut energy = EnergyTerm::default();

        for term in &self.bonds {
            let d = positions[term.i] - positions[term.j];
            let r = d.norm();
            let (e, de_dr) = potentials::harmonic_stretch(r, term.r0, p.bond_stiffness);
            energy.bond += e;
            if let Some(g) = gradient.as_deref_mut() {
                if r > MIN_DISTANCE {
                    let f = d * (de_dr / r);
                    g[term.i] += f;
                    g[term.j] -= f;
                }
            }
        }

        for term in &self.angles {
            let a = positions[term.i] - positions[term.center];
            let b = positions[term.k] - positions[term.center];
            let (la, lb) = (a.norm(), b.norm());
            if la < MIN_DISTANCE || lb < MIN_DISTANCE {
                continue;
            }
            let (ua, ub) = (a / la, b / lb);
            let cos = ua.dot(&ub).clamp(-1.0, 1.0);
            let (e, de_dc) = potentials::cosine_harmonic(cos, term.cos0, p.angle_stiffness);
            energy.angle += e;
            if let Some(g) = gradient.as_deref_mut() {
                let dc_di = (ub - ua * cos) / la;
                let dc_dk = (ua - ub * cos) / lb;
                g[term.i] += dc_di * de_dc;
                g[term.k] += dc_dk * de_dc;
                g[term.center] -= (dc_di + dc_dk) * de_dc;
            }
        }

        for term in &self.planes {
            let [i0, i1, i2, i3] = term.atoms;
            let a = positions[i1] - positions[i0];
            let b = positions[i2] - positions[i0];
            let c = positions[i3] - positions[i0];
            let bc = b.cross(&c);
            let volume = a.dot(&bc);
            let (e, de_dv) = potentials::planarity(volume, p.planarity_stiffness);
            energy.planarity += e;
            if let Some(g) = gradient.as_deref_mut() {
                let dv_da = bc;
                let dv_db = c.cross(&a);
                let dv_dc = a.cross(&b);
                g[i1] += dv_da * de_dv;
                g[i2] += dv_db * de_dv;
                g[i3] += dv_dc * de_dv;
                g[i0] -= (dv_da + dv_db + dv_dc) * de_dv;
            }
        }

        for term in &self.pairs {
            let d = positions[term.i] - positions[term.j];
            let r = d.norm();
            let (e, de_dr) = potentials::soft_repulsion(r, term.r0, p.repulsion_stiffness);
            if e == 0.0 {
                continue;
            }
            energy.repulsion += e;
            if let Some(g) = gradient.as_deref_mut() {
                if r > MIN_DISTANCE {
                    let f = d * (de_dr / r);
                    g[term.i] += f;
                    g[term.j] -= f;
                }
            }
        }

        energy
    }

    pub fn term_counts(&self) -> (usize, usize, usize, usize) {
        (
            self.bonds.len(),
            self.angles.len(),
            self.planes.len(),
            self.pairs.len(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::smiles::parse_smiles;

    fn distorted_positions(n: usize) -> Vec<Point3<f64>> {
        (0..n)
            .map(|i| {
                let t = i as f64;
                Point3::new(
                    1.1 * (0.7 * t).cos() + 0.3 * t,
                    1.3 * (1.3 * t).sin(),
                    0.4 * (2.1 * t).cos() - 0.1 * t,
                )
            })
            .collect()
    }

    fn check_gradient(smiles: &str) {
        let mol = parse_smiles(smiles).unwrap();
        let ff = ForceField::new(&mol, &ForceFieldParams::default());
        let positions = distorted_positions(mol.atom_count());
        let mut gradient = vec![Vector3::zeros(); mol.atom_count()];
        let energy = ff.energy_and_gradient(&positions, &mut gradient);
        assert!((energy.total() - ff.energy(&positions).total()).abs() < 1e-9);

        let h = 1e-6;
        for atom in 0..mol.atom_count() {
            for axis in 0..3 {
                let mut plus = positions.clone();
                let mut minus = positions.clone();
                plus[atom][axis] += h;
                minus[atom][axis] -= h;
                let numeric = (ff.energy(&plus).total() - ff.energy(&minus).total()) / (2.0 * h);
                let analytic = gradient[atom][axis];
                let scale = 1.0f64.max(analytic.abs());
                assert!(
                    (numeric - analytic).abs() / scale < 1e-4,
                    "{smiles}: atom {atom} axis {axis}: numeric {numeric} vs analytic {analytic}"
                );
            }
        }
    }

    #[test]
    fn analytic_gradient_matches_finite_differences_for_alkane() {
        check_gradient("CCCC");
    }

    #[test]
    fn analytic_gradient_matches_finite_differences_for_planar_groups() {
        check_gradient("C=CC(=O)N");
        check_gradient("c1ccccc1C#N");
    }

    #[test]
    fn ideal_bond_lengths_follow_bond_order() {
        let params = ForceFieldParams::default();
        let ethane = parse_smiles("CC").unwrap();
        let ethene = parse_smiles("C=C").unwrap();
        let benzene = parse_smiles("c1ccccc1").unwrap();
        let single = ideal_bond_length(&ethane, 0, &params).unwrap();
        let double = ideal_bond_length(&ethene, 0, &params).unwrap();
        let aromatic = ideal_bond_length(&benzene, 0, &params).unwrap();
        assert!((single - 1.52).abs() < 1e-9);
        assert!(double < aromatic && aromatic < single);
        assert!((aromatic - 1.38).abs() < 0.01);
        assert!((double - 1.33).abs() < 0.01);
    }

    #[test]
    fn term_lists_reflect_topology() {
        // Ethane: 7 bonds, 12 angles (6 around each carbon), 9 H-H 1-4 pairs.
        let ethane = parse_smiles("CC").unwrap();
        let ff = ForceField::new(&ethane, &ForceFieldParams::default());
        assert_eq!(ff.term_counts(), (7, 12, 0, 9));
        assert_eq!(ff.atom_count(), 8);

        // Ethene: two sp2 centers plus four H-C=C-H torsional quadruples.
        let ethene = parse_smiles("C=C").unwrap();
        let ff = ForceField::new(&ethene, &ForceFieldParams::default());
        assert_eq!(ff.term_counts().2, 6);
    }

    #[test]
    fn relaxed_geometry_has_lower_energy_than_distorted() {
        let mol = parse_smiles("C").unwrap();
        let ff = ForceField::new(&mol, &ForceFieldParams::default());
        let r = 1.07;
        let s = r / 3f64.sqrt();
        let ideal = vec![
            Point3::origin(),
            Point3::new(s, s, s),
            Point3::new(s, -s, -s),
            Point3::new(-s, s, -s),
            Point3::new(-s, -s, s),
        ];
        assert!(ff.energy(&ideal).total() < 1e-9);
        assert!(ff.energy(&distorted_positions(5)).total() > 1.0);
    }
}
