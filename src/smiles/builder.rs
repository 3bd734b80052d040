use petgraph::graph::NodeIndex;

use crate::atom::Atom;
use crate::bond::{BondStereo, SmilesBond, SmilesBondOrder};
use crate::mol::Mol;
use crate::smiles::parse_tree::{ParseAtom, ParseTree};
use crate::smiles::tokenizer::BondToken;
use crate::valence::implicit_hydrogens;

pub fn build_mol(tree: &ParseTree) -> Mol<Atom, SmilesBond> {
    let mut mol = Mol::new();
    let indices: Vec<NodeIndex> = tree
        .atoms
        .iter()
        .map(|p| {
            mol.add_atom(Atom {
                atomic_num: p.element.atomic_num(),
                formal_charge: p.charge,
                isotope: p.isotope,
                hydrogen_count: 0,
                is_aromatic: p.is_aromatic,
            })
        })
        .collect();

    for (i, parse_atom) in tree.atoms.iter().enumerate() {
        for neighbor in &parse_atom.neighbors {
            let j = neighbor.atom_idx;
            // Each bond is listed on both ends; add it once.
            if j < i || mol.bond_between(indices[i], indices[j]).is_some() {
                continue;
            }
            let order = resolve_bond_order(
                neighbor.bond,
                parse_atom.is_aromatic,
                tree.atoms[j].is_aromatic,
            );
            mol.add_bond(
                indices[i],
                indices[j],
                SmilesBond {
                    order,
                    stereo: BondStereo::None,
                },
            );
        }
    }

    for (parse_atom, &idx) in tree.atoms.iter().zip(&indices) {
        let h = if parse_atom.is_bracket {
            parse_atom.hcount.unwrap_or(0)
        } else {
            bare_atom_hydrogens(&mol, idx, parse_atom)
        };
        mol.atom_mut(idx).hydrogen_count = h;
    }

    mol
}

fn resolve_bond_order(
    bond_tok: Option<BondToken>,
    from_aromatic: bool,
    to_aromatic: bool,
) -> SmilesBondOrder {
    match bond_tok {
        Some(BondToken::Single) | Some(BondToken::Up) | Some(BondToken::Down) => {
            SmilesBondOrder::Single
        }
        Some(BondToken::Double) => SmilesBondOrder::Double,
        Some(BondToken::Triple) => SmilesBondOrder::Triple,
        Some(BondToken::Aromatic) => SmilesBondOrder::Aromatic,
        None if from_aromatic && to_aromatic => SmilesBondOrder::Aromatic,
        None => SmilesBondOrder::Implicit,
    }
}

fn bare_atom_hydrogens(mol: &Mol<Atom, SmilesBond>, node: NodeIndex, parse_atom: &ParseAtom) -> u8 {
    let bond_order_sum: u8 = mol
        .bonds_of(node)
        .map(|e| mol.bond(e).order.valence_contribution())
        .fold(0, u8::saturating_add);

    let h = implicit_hydrogens(parse_atom.element, 0, bond_order_sum);

    // One valence of an aromatic atom goes to the delocalized pi bond.
    if parse_atom.is_aromatic && h > 0 {
        h - 1
    } else {
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse_tree::build_parse_tree;
    use crate::smiles::tokenizer::tokenize;

    fn parse(s: &str) -> Mol<Atom, SmilesBond> {
        let tokens = tokenize(s).unwrap();
        let tree = build_parse_tree(&tokens).unwrap();
        build_mol(&tree)
    }

    fn h(mol: &Mol<Atom, SmilesBond>, i: usize) -> u8 {
        mol.atom(NodeIndex::new(i)).hydrogen_count
    }

    #[test]
    fn methane_h_count() {
        let mol = parse("C");
        assert_eq!(mol.atom_count(), 1);
        assert_eq!(h(&mol, 0), 4);
    }

    #[test]
    fn ethene_h_counts() {
        let mol = parse("C=C");
        assert_eq!(h(&mol, 0), 2);
        assert_eq!(h(&mol, 1), 2);
    }

    #[test]
    fn bracket_atoms_use_explicit_h() {
        assert_eq!(h(&parse("[CH4]"), 0), 4);
        assert_eq!(h(&parse("[C]"), 0), 0);
    }

    #[test]
    fn aromatic_carbon_benzene() {
        let mol = parse("c1ccccc1");
        for i in 0..6 {
            let atom = mol.atom(NodeIndex::new(i));
            assert!(atom.is_aromatic);
            assert_eq!(atom.hydrogen_count, 1, "atom {i} should have 1 H");
        }
    }

    #[test]
    fn ring_closure_bond_added_once() {
        let mol = parse("C1CC1");
        assert_eq!(mol.bond_count(), 3);
    }

    #[test]
    fn amine_nitrogen() {
        // amphetamine backbone: CC(N)Cc1ccccc1
        let mol = parse("CC(N)Cc1ccccc1");
        assert_eq!(h(&mol, 2), 2);
        assert_eq!(h(&mol, 1), 1);
        assert_eq!(h(&mol, 4), 0);
    }
}
