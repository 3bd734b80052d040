//! Kekulization assigns alternating single and double bonds to aromatic
//! systems, turning a `Mol<Atom, SmilesBond>` into a `Mol<Atom, Bond>`.
//!
//! Atoms of an aromatic system that are one valence short receive exactly
//! one double bond. The assignment is a maximum matching over aromatic
//! bonds grown by augmenting paths.

use std::collections::{HashSet, VecDeque};
use std::fmt;

use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::atom::Atom;
use crate::bond::{Bond, BondOrder, SmilesBond, SmilesBondOrder};
use crate::element::Element;
use crate::mol::Mol;

/// Error returned when no valid Kekulé structure exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KekulizeError {
    /// The given atoms could not be assigned a double bond.
    Unkekulizable(Vec<NodeIndex>),
}

impl fmt::Display for KekulizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unkekulizable(atoms) => {
                let listed: Vec<String> = atoms.iter().map(|a| a.index().to_string()).collect();
                write!(
                    f,
                    "cannot kekulize aromatic system: unmatched atoms [{}]",
                    listed.join(", ")
                )
            }
        }
    }
}

impl std::error::Error for KekulizeError {}

type Adjacency = Vec<Vec<(NodeIndex, EdgeIndex)>>;

/// Replace aromatic bonds with a concrete single/double pattern.
///
/// Atoms, indices, and bond stereo marks are carried over unchanged.
pub fn kekulize(mol: Mol<Atom, SmilesBond>) -> Result<Mol<Atom, Bond>, KekulizeError> {
    let n = mol.atom_count();
    let mut adjacency: Adjacency = vec![Vec::new(); n];
    for e in mol.bonds() {
        if mol.bond(e).order != SmilesBondOrder::Aromatic {
            continue;
        }
        if let Some((a, b)) = mol.bond_endpoints(e) {
            adjacency[a.index()].push((b, e));
            adjacency[b.index()].push((a, e));
        }
    }

    let needs_double: Vec<bool> = mol
        .atoms()
        .map(|v| !adjacency[v.index()].is_empty() && lacks_one_bond(&mol, v))
        .collect();

    let mut matched: Vec<Option<EdgeIndex>> = vec![None; n];
    let candidates: Vec<NodeIndex> = mol.atoms().filter(|v| needs_double[v.index()]).collect();
    for &start in &candidates {
        if matched[start.index()].is_none() {
            augment(&mol, &adjacency, &needs_double, &mut matched, start);
        }
    }

    let unmatched: Vec<NodeIndex> = candidates
        .into_iter()
        .filter(|v| matched[v.index()].is_none())
        .collect();
    if !unmatched.is_empty() {
        return Err(KekulizeError::Unkekulizable(unmatched));
    }

    let doubles: HashSet<EdgeIndex> = matched.into_iter().flatten().collect();
    let mut result = Mol::new();
    for v in mol.atoms() {
        result.add_atom(mol.atom(v).clone());
    }
    for e in mol.bonds() {
        let Some((a, b)) = mol.bond_endpoints(e) else {
            continue;
        };
        let bond = mol.bond(e);
        let order = match bond.order {
            SmilesBondOrder::Aromatic if doubles.contains(&e) => BondOrder::Double,
            SmilesBondOrder::Aromatic | SmilesBondOrder::Implicit | SmilesBondOrder::Single => {
                BondOrder::Single
            }
            SmilesBondOrder::Double => BondOrder::Double,
            SmilesBondOrder::Triple => BondOrder::Triple,
        };
        result.add_bond(
            a,
            b,
            Bond {
                order,
                stereo: bond.stereo,
            },
        );
    }
    Ok(result)
}

fn lacks_one_bond(mol: &Mol<Atom, SmilesBond>, v: NodeIndex) -> bool {
    let atom = mol.atom(v);
    let Some(element) = Element::from_atomic_num(atom.atomic_num) else {
        return false;
    };
    let used: u8 = mol
        .bonds_of(v)
        .map(|e| mol.bond(e).order.valence_contribution())
        .fold(atom.hydrogen_count, u8::saturating_add);

    let charge = i16::from(atom.formal_charge);
    let target = element
        .default_valences()
        .iter()
        .map(|&valence| i16::from(valence) + charge)
        .filter(|&valence| valence > 0)
        .find(|&valence| valence >= i16::from(used));
    match target {
        Some(valence) => {
            let gap = valence - i16::from(used);
            // A bare charged ring atom ([n+], [c-]) donates its own pair.
            gap == 1 || (gap == 2 && atom.hydrogen_count == 0 && atom.formal_charge != 0)
        }
        None => false,
    }
}

fn augment(
    mol: &Mol<Atom, SmilesBond>,
    adjacency: &Adjacency,
    needs_double: &[bool],
    matched: &mut [Option<EdgeIndex>],
    start: NodeIndex,
) -> bool {
    let n = mol.atom_count();
    let mut prev: Vec<Option<(NodeIndex, EdgeIndex)>> = vec![None; n];
    let mut visited = vec![false; n];
    let mut queue = VecDeque::from([start]);
    visited[start.index()] = true;

    while let Some(u) = queue.pop_front() {
        for &(v, e) in &adjacency[u.index()] {
            if !needs_double[v.index()] || visited[v.index()] || matched[u.index()] == Some(e) {
                continue;
            }
            visited[v.index()] = true;
            prev[v.index()] = Some((u, e));

            let Some(partner_edge) = matched[v.index()] else {
                flip_path(matched, &prev, start, v);
                return true;
            };
            let Some((a, b)) = mol.bond_endpoints(partner_edge) else {
                continue;
            };
            let w = if a == v { b } else { a };
            if !visited[w.index()] {
                visited[w.index()] = true;
                prev[w.index()] = Some((v, partner_edge));
                queue.push_back(w);
            }
        }
    }
    false
}

fn flip_path(
    matched: &mut [Option<EdgeIndex>],
    prev: &[Option<(NodeIndex, EdgeIndex)>],
    start: NodeIndex,
    end: NodeIndex,
) {
    let mut cur = end;
    let mut take = true;
    while cur != start {
        let Some((p, e)) = prev[cur.index()] else {
            return;
        };
        if take {
            matched[cur.index()] = Some(e);
            matched[p.index()] = Some(e);
        }
        take = !take;
        cur = p;
    }
}
