mod builder;
pub mod error;
mod parse_tree;
mod tokenizer;

use crate::atom::Atom;
use crate::bond::{Bond, SmilesBond};
use crate::kekulize;
use crate::mol::Mol;
use crate::valence::check_valences;
pub use error::SmilesError;

/// Parse SMILES into a graph whose aromatic bonds are still unassigned.
pub fn parse_smiles(s: &str) -> Result<Mol<Atom, SmilesBond>, SmilesError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(SmilesError::EmptyInput);
    }
    let tokens = tokenizer::tokenize(trimmed)?;
    if tokens.is_empty() {
        return Err(SmilesError::EmptyInput);
    }
    let tree = parse_tree::build_parse_tree(&tokens)?;
    Ok(builder::build_mol(&tree))
}

/// Parse SMILES and assign a Kekulé structure to every aromatic system.
///
/// Atoms bonded beyond their element's valence are rejected.
pub fn from_smiles(s: &str) -> Result<Mol<Atom, Bond>, SmilesError> {
    let mol = kekulize::kekulize(parse_smiles(s)?)?;
    check_valences(&mol)?;
    Ok(mol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bond::{BondOrder, SmilesBondOrder};
    use petgraph::graph::NodeIndex;

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    fn atom(mol: &Mol<Atom, SmilesBond>, i: usize) -> &Atom {
        mol.atom(n(i))
    }

    #[test]
    fn ethane() {
        let mol = parse_smiles("CC").unwrap();
        assert_eq!(mol.atom_count(), 2);
        assert_eq!(mol.bond_count(), 1);
        assert_eq!(atom(&mol, 0).hydrogen_count, 3);
        assert_eq!(atom(&mol, 1).hydrogen_count, 3);
    }

    #[test]
    fn ethyne() {
        let mol = parse_smiles("C#C").unwrap();
        let edge = mol.bond_between(n(0), n(1)).unwrap();
        assert_eq!(mol.bond(edge).order, SmilesBondOrder::Triple);
        assert_eq!(atom(&mol, 0).hydrogen_count, 1);
    }

    #[test]
    fn acetic_acid() {
        let mol = parse_smiles("CC(=O)O").unwrap();
        assert_eq!(mol.atom_count(), 4);
        assert_eq!(atom(&mol, 0).hydrogen_count, 3);
        assert_eq!(atom(&mol, 1).hydrogen_count, 0);
        assert_eq!(atom(&mol, 2).hydrogen_count, 0);
        assert_eq!(atom(&mol, 3).hydrogen_count, 1);
    }

    #[test]
    fn neopentane() {
        let mol = parse_smiles("CC(C)(C)C").unwrap();
        assert_eq!(mol.atom_count(), 5);
        assert_eq!(mol.bond_count(), 4);
        assert_eq!(atom(&mol, 1).hydrogen_count, 0);
    }

    #[test]
    fn multi_digit_ring() {
        let mol = parse_smiles("C%10CC%10").unwrap();
        assert_eq!(mol.atom_count(), 3);
        assert_eq!(mol.bond_count(), 3);
    }

    #[test]
    fn ammonium() {
        let mol = parse_smiles("[NH4+]").unwrap();
        assert_eq!(atom(&mol, 0).formal_charge, 1);
        assert_eq!(atom(&mol, 0).hydrogen_count, 4);
    }

    #[test]
    fn deuterium() {
        let mol = parse_smiles("[2H]").unwrap();
        assert_eq!(atom(&mol, 0).isotope, 2);
        assert_eq!(atom(&mol, 0).atomic_num, 1);
    }

    #[test]
    fn pyrrole() {
        let mol = parse_smiles("[nH]1cccc1").unwrap();
        assert_eq!(atom(&mol, 0).hydrogen_count, 1);
        for i in 1..5 {
            assert_eq!(atom(&mol, i).hydrogen_count, 1);
        }
    }

    #[test]
    fn phenol_bond_to_ring_is_implicit() {
        let mol = parse_smiles("Oc1ccccc1").unwrap();
        assert_eq!(atom(&mol, 0).hydrogen_count, 1);
        let bond_o_c = mol.bond_between(n(0), n(1)).unwrap();
        assert_eq!(mol.bond(bond_o_c).order, SmilesBondOrder::Implicit);
    }

    #[test]
    fn stereo_marks_are_accepted() {
        let mol = parse_smiles(r"C[C@H](N)Cc1ccccc1").unwrap();
        assert_eq!(mol.atom_count(), 10);
        assert_eq!(atom(&mol, 1).hydrogen_count, 1);
        let mol = parse_smiles(r"F/C=C\F").unwrap();
        let edge = mol.bond_between(n(1), n(2)).unwrap();
        assert_eq!(mol.bond(edge).order, SmilesBondOrder::Double);
    }

    #[test]
    fn sodium_chloride() {
        let mol = parse_smiles("[Na+].[Cl-]").unwrap();
        assert_eq!(mol.atom_count(), 2);
        assert_eq!(mol.bond_count(), 0);
        assert_eq!(atom(&mol, 0).formal_charge, 1);
        assert_eq!(atom(&mol, 1).formal_charge, -1);
    }

    #[test]
    fn error_cases() {
        for bad in ["", "   ", "C(C", "C)C", "C1CC", "X", "[C", "C=1CC#1"] {
            assert!(parse_smiles(bad).is_err(), "{bad:?} should fail");
        }
    }

    #[test]
    fn empty_is_reported_as_such() {
        assert_eq!(parse_smiles(" ").unwrap_err(), SmilesError::EmptyInput);
    }

    #[test]
    fn nitro_group() {
        let mol = parse_smiles("C[N+](=O)[O-]").unwrap();
        assert_eq!(atom(&mol, 1).formal_charge, 1);
        assert_eq!(atom(&mol, 3).formal_charge, -1);
    }

    #[test]
    fn dmt_kekulizes() {
        // N,N-dimethyltryptamine
        let mol = from_smiles("CN(C)CCc1c[nH]c2ccccc12").unwrap();
        assert_eq!(mol.atom_count(), 14);
        assert_eq!(mol.bond_count(), 15);
        let doubles = mol
            .bonds()
            .filter(|&e| mol.bond(e).order == BondOrder::Double)
            .count();
        assert_eq!(doubles, 4);
    }

    #[test]
    fn mdma_kekulizes() {
        let mol = from_smiles("CNC(C)Cc1ccc2OCOc2c1").unwrap();
        assert_eq!(mol.atom_count(), 14);
        let doubles = mol
            .bonds()
            .filter(|&e| mol.bond(e).order == BondOrder::Double)
            .count();
        assert_eq!(doubles, 3);
    }

    #[test]
    fn kekulize_failure_surfaces() {
        assert!(matches!(
            from_smiles("c1cccc1"),
            Err(SmilesError::Kekulize(_))
        ));
    }

    #[test]
    fn hypervalent_atoms_are_rejected() {
        assert!(parse_smiles("C(C)(C)(C)(C)C").is_ok());
        match from_smiles("C(C)(C)(C)(C)C") {
            Err(SmilesError::Valence(e)) => assert_eq!(e.valence, 5),
            other => panic!("expected a valence error, got {other:?}"),
        }
        assert!(matches!(from_smiles("[CH5]"), Err(SmilesError::Valence(_))));
        assert!(matches!(from_smiles("FF=C"), Err(SmilesError::Valence(_))));
        assert!(from_smiles("[CH4]").is_ok());
    }
}
