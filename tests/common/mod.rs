#![allow(dead_code)]

use psymol::render::depict_smiles;
use psymol::{HasAtomicNum, HasBondOrder, HasPosition2D, ParsedMolecule, Renderer};

pub fn renderer() -> Renderer {
    Renderer::default()
}

/// A V2000 molfile with the given atoms `(x, y, symbol)` and 1-based bonds
/// `(a, b, order)`.
pub fn molfile(atoms: &[(f64, f64, &str)], bonds: &[(usize, usize, u8)]) -> String {
    let mut out = String::from("fixture\n     RDKit          2D\n\n");
    out.push_str(&format!(
        "{:>3}{:>3}  0  0  0  0  0  0  0  0999 V2000\n",
        atoms.len(),
        bonds.len()
    ));
    for (x, y, symbol) in atoms {
        out.push_str(&format!(
            "{x:>10.4}{y:>10.4}{z:>10.4} {symbol:<3} 0  0  0  0  0  0  0  0  0  0  0  0\n",
            z = 0.0
        ));
    }
    for (a, b, order) in bonds {
        out.push_str(&format!("{a:>3}{b:>3}{order:>3}  0\n"));
    }
    out.push_str("M  END\n");
    out
}

/// Molfile of `mol`, optionally dropping its coordinates.
pub fn molfile_of(mol: &ParsedMolecule, keep_coordinates: bool) -> String {
    let atoms: Vec<(f64, f64, &str)> = mol
        .atoms()
        .map(|a| {
            let atom = mol.atom(a);
            let [x, y] = match (keep_coordinates, atom.position_2d()) {
                (true, Some(p)) => p,
                _ => [0.0, 0.0],
            };
            let symbol = psymol::Element::from_atomic_num(atom.atomic_num())
                .map_or("C", |e| e.symbol());
            (x, y, symbol)
        })
        .collect();
    let bonds: Vec<(usize, usize, u8)> = mol
        .bonds()
        .filter_map(|e| {
            let (a, b) = mol.bond_endpoints(e)?;
            let order = mol.bond(e).bond_order().valence_contribution();
            Some((a.index() + 1, b.index() + 1, order))
        })
        .collect();
    molfile(&atoms, &bonds)
}

/// Molfile with the depiction the SMILES path would draw.
pub fn molfile_from_smiles(smiles: &str, keep_coordinates: bool) -> String {
    let mol = depict_smiles(smiles).expect("valid SMILES");
    molfile_of(&mol, keep_coordinates)
}

pub const AMPHETAMINE: &str = "CC(N)Cc1ccccc1";
pub const MDMA: &str = "CNC(C)Cc1ccc2OCOc2c1";
pub const DMT: &str = "CN(C)CCc1c[nH]c2ccccc12";
