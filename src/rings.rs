//! Smallest set of smallest rings and the ring systems built from it.
//!
//! Rings are found from Horton candidates (two shortest paths closed by an
//! edge) filtered through a GF(2) basis of the cycle space. Each ring is
//! stored in cyclic order starting from its lowest atom index.

use std::collections::VecDeque;

use petgraph::algo::connected_components;
use petgraph::graph::NodeIndex;

use crate::mol::Mol;

#[derive(Debug, Clone, Default)]
pub struct RingInfo {
    rings: Vec<Vec<NodeIndex>>,
}

impl RingInfo {
    pub fn sssr<A, B>(mol: &Mol<A, B>) -> Self {
        let needed = Self::expected_ring_count(mol);
        if needed == 0 {
            return Self::default();
        }

        let words = mol.bond_count().div_ceil(64);
        let mut basis: Vec<Vec<u64>> = Vec::with_capacity(needed);
        let mut rings = Vec::with_capacity(needed);
        for ring in horton_candidates(mol) {
            if rings.len() == needed {
                break;
            }
            let bits = edge_bits(mol, &ring, words);
            if bits.iter().any(|&w| w != 0) && reduce_into_basis(&mut basis, bits) {
                rings.push(normalize_ring(&ring));
            }
        }
        rings.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
        Self { rings }
    }

    /// Cyclomatic number: bonds minus atoms plus components.
    pub fn expected_ring_count<A, B>(mol: &Mol<A, B>) -> usize {
        (mol.bond_count() + connected_components(mol.graph())).saturating_sub(mol.atom_count())
    }

    pub fn num_rings(&self) -> usize {
        self.rings.len()
    }

    pub fn rings(&self) -> &[Vec<NodeIndex>] {
        &self.rings
    }

    pub fn is_ring_atom(&self, atom: NodeIndex) -> bool {
        self.rings.iter().any(|ring| ring.contains(&atom))
    }

    pub fn is_ring_bond(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.rings_with_bond(a, b).next().is_some()
    }

    /// Rings that contain the bond `a`-`b` as one of their edges.
    pub fn rings_with_bond(
        &self,
        a: NodeIndex,
        b: NodeIndex,
    ) -> impl Iterator<Item = &Vec<NodeIndex>> + '_ {
        self.rings.iter().filter(move |ring| {
            let len = ring.len();
            (0..len).any(|i| {
                let (x, y) = (ring[i], ring[(i + 1) % len]);
                (x == a && y == b) || (x == b && y == a)
            })
        })
    }

    /// Groups of ring indices whose rings share at least one atom.
    ///
    /// Groups come out ordered by their first ring, and ring indices inside a
    /// group are in discovery order, so each ring after the first touches an
    /// earlier one.
    pub fn ring_systems(&self) -> Vec<Vec<usize>> {
        let mut seen = vec![false; self.rings.len()];
        let mut systems = Vec::new();
        for start in 0..self.rings.len() {
            if seen[start] {
                continue;
            }
            seen[start] = true;
            let mut system = vec![start];
            let mut queue = VecDeque::from([start]);
            while let Some(r) = queue.pop_front() {
                for other in 0..self.rings.len() {
                    if !seen[other] && self.rings[r].iter().any(|a| self.rings[other].contains(a)) {
                        seen[other] = true;
                        system.push(other);
                        queue.push_back(other);
                    }
                }
            }
            systems.push(system);
        }
        systems
    }
}

fn horton_candidates<A, B>(mol: &Mol<A, B>) -> Vec<Vec<NodeIndex>> {
    let n = mol.atom_count();
    let trees: Vec<BfsTree> = (0..n).map(|s| BfsTree::new(mol, NodeIndex::new(s))).collect();

    let mut candidates: Vec<Vec<NodeIndex>> = Vec::new();
    for edge in mol.bonds() {
        let Some((u, v)) = mol.bond_endpoints(edge) else {
            continue;
        };
        for tree in &trees {
            let (Some(du), Some(dv)) = (tree.dist[u.index()], tree.dist[v.index()]) else {
                continue;
            };
            if du + dv + 1 < 3 {
                continue;
            }
            let to_u = tree.path_to(u);
            let to_v = tree.path_to(v);
            if to_u[1..].iter().any(|x| to_v[1..].contains(x)) {
                continue;
            }
            let mut ring = to_u;
            ring.extend(to_v[1..].iter().rev());
            candidates.push(ring);
        }
    }

    candidates.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    candidates.dedup();
    candidates
}

struct BfsTree {
    root: NodeIndex,
    dist: Vec<Option<usize>>,
    parent: Vec<Option<NodeIndex>>,
}

impl BfsTree {
    fn new<A, B>(mol: &Mol<A, B>, root: NodeIndex) -> Self {
        let n = mol.atom_count();
        let mut dist = vec![None; n];
        let mut parent = vec![None; n];
        dist[root.index()] = Some(0);
        let mut queue = VecDeque::from([root]);
        while let Some(cur) = queue.pop_front() {
            let d = dist[cur.index()].unwrap_or(0);
            for nb in mol.neighbors(cur) {
                if dist[nb.index()].is_none() {
                    dist[nb.index()] = Some(d + 1);
                    parent[nb.index()] = Some(cur);
                    queue.push_back(nb);
                }
            }
        }
        Self { root, dist, parent }
    }

    /// Path from the root to `to`, both ends included.
    fn path_to(&self, to: NodeIndex) -> Vec<NodeIndex> {
        let mut path = vec![to];
        let mut cur = to;
        while cur != self.root {
            match self.parent[cur.index()] {
                Some(p) => {
                    path.push(p);
                    cur = p;
                }
                None => break,
            }
        }
        path.reverse();
        path
    }
}

fn edge_bits<A, B>(mol: &Mol<A, B>, ring: &[NodeIndex], words: usize) -> Vec<u64> {
    let mut bits = vec![0u64; words];
    for i in 0..ring.len() {
        if let Some(edge) = mol.bond_between(ring[i], ring[(i + 1) % ring.len()]) {
            let idx = edge.index();
            bits[idx / 64] |= 1u64 << (idx % 64);
        }
    }
    bits
}

/// Gaussian elimination over GF(2); returns false if `v` is already spanned.
fn reduce_into_basis(basis: &mut Vec<Vec<u64>>, mut v: Vec<u64>) -> bool {
    for row in basis.iter() {
        if let Some(p) = lowest_bit(row) {
            if v[p / 64] & (1u64 << (p % 64)) != 0 {
                for (a, b) in v.iter_mut().zip(row) {
                    *a ^= *b;
                }
            }
        }
    }
    if v.iter().all(|&w| w == 0) {
        return false;
    }
    basis.push(v);
    true
}

fn lowest_bit(bits: &[u64]) -> Option<usize> {
    bits.iter()
        .enumerate()
        .find(|(_, &w)| w != 0)
        .map(|(i, &w)| i * 64 + w.trailing_zeros() as usize)
}

fn normalize_ring(ring: &[NodeIndex]) -> Vec<NodeIndex> {
    let Some(start) = ring
        .iter()
        .enumerate()
        .min_by_key(|&(_, idx)| idx)
        .map(|(i, _)| i)
    else {
        return Vec::new();
    };
    let len = ring.len();
    let mut out: Vec<NodeIndex> = (0..len).map(|i| ring[(start + i) % len]).collect();
    if len > 2 && out[1] > out[len - 1] {
        out[1..].reverse();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::from_smiles;

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    fn sizes(smiles: &str) -> Vec<usize> {
        let mol = from_smiles(smiles).unwrap();
        RingInfo::sssr(&mol).rings().iter().map(Vec::len).collect()
    }

    #[test]
    fn simple_rings() {
        assert_eq!(sizes("C1CC1"), vec![3]);
        assert_eq!(sizes("C1CCCCC1"), vec![6]);
        assert_eq!(sizes("c1ccccc1"), vec![6]);
        assert!(sizes("CCCC").is_empty());
    }

    #[test]
    fn fused_and_bridged() {
        assert_eq!(sizes("c1ccc2ccccc2c1"), vec![6, 6]);
        assert_eq!(sizes("C1CCC2CCCCC2C1"), vec![6, 6]);
        assert_eq!(sizes("c1ccc2cc3ccccc3cc2c1"), vec![6, 6, 6]);
        assert_eq!(sizes("C1CC2CC1CC2"), vec![5, 5]);
        assert_eq!(sizes("C1CCC2(CC1)CCC2"), vec![4, 6]);
    }

    #[test]
    fn cubane() {
        let mol = from_smiles("C12C3C4C1C5C3C4C25").unwrap();
        assert_eq!(RingInfo::expected_ring_count(&mol), 5);
        assert_eq!(RingInfo::sssr(&mol).num_rings(), 5);
    }

    #[test]
    fn rings_are_in_cyclic_order() {
        let mol = from_smiles("c1ccc2ccccc2c1").unwrap();
        for ring in RingInfo::sssr(&mol).rings() {
            for i in 0..ring.len() {
                let next = ring[(i + 1) % ring.len()];
                assert!(mol.bond_between(ring[i], next).is_some());
            }
        }
    }

    #[test]
    fn ring_membership() {
        let mol = from_smiles("Oc1ccccc1").unwrap();
        let ri = RingInfo::sssr(&mol);
        assert!(!ri.is_ring_atom(n(0)));
        assert!(!ri.is_ring_bond(n(0), n(1)));
        for i in 1..7 {
            assert!(ri.is_ring_atom(n(i)), "atom {i} should be in ring");
        }
        assert!(ri.is_ring_bond(n(1), n(2)));
        assert!(ri.is_ring_bond(n(6), n(1)));
    }

    #[test]
    fn fusion_bond_is_in_two_rings() {
        let mol = from_smiles("c1ccc2ccccc2c1").unwrap();
        let ri = RingInfo::sssr(&mol);
        assert_eq!(ri.rings_with_bond(n(3), n(8)).count(), 2);
        assert_eq!(ri.rings_with_bond(n(0), n(1)).count(), 1);
    }

    #[test]
    fn ring_systems_group_fused_rings() {
        // biphenyl: two separate systems
        let mol = from_smiles("c1ccccc1-c1ccccc1").unwrap();
        assert_eq!(RingInfo::sssr(&mol).ring_systems().len(), 2);

        // LSD core: four fused rings in one system
        let mol = from_smiles("CCN(CC)C(=O)C1CN(C)C2Cc3c[nH]c4cccc(C2=C1)c34").unwrap();
        let ri = RingInfo::sssr(&mol);
        assert_eq!(ri.num_rings(), 4);
        let systems = ri.ring_systems();
        assert_eq!(systems.len(), 1);
        let mut members = systems[0].clone();
        members.sort();
        assert_eq!(members, vec![0, 1, 2, 3]);
    }
}
