use std::collections::BTreeMap;
use std::f64::consts::{FRAC_PI_3, PI, TAU};

use petgraph::graph::NodeIndex;

use super::geometry::{self, Point};
use super::ring_system;
use crate::atom::Atom;
use crate::bond::{Bond, BondOrder};
use crate::graph_ops::connected_components;
use crate::mol::{Mol, ParsedMolecule};
use crate::rings::RingInfo;
use crate::wrappers::WithPosition2D;

/// Bond length of generated layouts, in layout units.
pub const BOND_LENGTH: f64 = 1.5;

/// Horizontal gap between disconnected fragments, in bond lengths.
const FRAGMENT_GAP: f64 = 2.0;

/// Synthesize 2D coordinates for a molecule that has none.
///
/// Ring systems are placed as rigid templates; acyclic atoms are added by a
/// depth-first walk that zig-zags chains at 120° and keeps sp centres
/// straight. Fragments are laid out left to right. The result depends only
/// on the molecule and its atom order.
pub fn generate_coordinates(mol: &Mol<Atom, Bond>) -> ParsedMolecule {
    let mut placer = Placer::new(mol);
    let mut cursor = 0.0;
    for component in connected_components(mol) {
        placer.place_component(&component);
        cursor = placer.shift_component(&component, cursor) + FRAGMENT_GAP * BOND_LENGTH;
    }
    mol.map_atoms(|idx, atom| {
        WithPosition2D::new(atom.clone(), Some(placer.pos[idx.index()].unwrap_or([0.0, 0.0])))
    })
}

struct Placer<'a> {
    mol: &'a Mol<Atom, Bond>,
    system_of: Vec<Option<usize>>,
    templates: Vec<BTreeMap<NodeIndex, Point>>,
    pos: Vec<Option<Point>>,
    /// Sign of the last zig-zag turn taken to reach each atom.
    turn: Vec<f64>,
}

impl<'a> Placer<'a> {
    fn new(mol: &'a Mol<Atom, Bond>) -> Self {
        let n = mol.atom_count();
        let ring_info = RingInfo::sssr(mol);
        let mut system_of = vec![None; n];
        let mut templates = Vec::new();
        for (id, system) in ring_info.ring_systems().into_iter().enumerate() {
            let rings: Vec<&[NodeIndex]> = system
                .iter()
                .map(|&r| ring_info.rings()[r].as_slice())
                .collect();
            let template = ring_system::layout(&rings, BOND_LENGTH);
            for atom in template.keys() {
                system_of[atom.index()] = Some(id);
            }
            templates.push(template);
        }
        Self {
            mol,
            system_of,
            templates,
            pos: vec![None; n],
            turn: vec![1.0; n],
        }
    }

    fn place_component(&mut self, component: &[NodeIndex]) {
        let mut stack: Vec<NodeIndex> = Vec::new();

        let root_system = component
            .iter()
            .filter_map(|a| self.system_of[a.index()])
            .max_by_key(|&s| (self.templates[s].len(), std::cmp::Reverse(s)));
        match root_system {
            Some(system) => {
                let placed: Vec<(NodeIndex, Point)> =
                    self.templates[system].iter().map(|(&a, &p)| (a, p)).collect();
                for (atom, p) in placed.into_iter().rev() {
                    self.pos[atom.index()] = Some(p);
                    stack.push(atom);
                }
            }
            None => {
                let Some(&root) = component
                    .iter()
                    .find(|&&a| self.mol.degree(a) <= 1)
                    .or_else(|| component.first())
                else {
                    return;
                };
                self.pos[root.index()] = Some([0.0, 0.0]);
                stack.push(root);
            }
        }

        while let Some(atom) = stack.pop() {
            let placed = self.expand(atom, component);
            stack.extend(placed.into_iter().rev());
        }
    }

    /// Place every unplaced neighbour of `atom`; returns the atoms placed.
    fn expand(&mut self, atom: NodeIndex, component: &[NodeIndex]) -> Vec<NodeIndex> {
        let Some(origin) = self.pos[atom.index()] else {
            return Vec::new();
        };
        let mut neighbors: Vec<NodeIndex> = self.mol.neighbors(atom).collect();
        neighbors.sort();
        let (placed, children): (Vec<NodeIndex>, Vec<NodeIndex>) = neighbors
            .into_iter()
            .partition(|nb| self.pos[nb.index()].is_some());
        if children.is_empty() {
            return Vec::new();
        }

        let directions = self.child_directions(atom, origin, &placed, children.len(), component);
        let mut out = Vec::new();
        for (child, (dir, turn)) in children.into_iter().zip(directions) {
            if self.pos[child.index()].is_some() {
                continue;
            }
            match self.system_of[child.index()] {
                Some(system) => out.extend(self.attach_system(system, child, origin, dir)),
                None => {
                    self.pos[child.index()] =
                        Some(geometry::add(origin, geometry::scale(dir, BOND_LENGTH)));
                    self.turn[child.index()] = turn;
                    out.push(child);
                }
            }
        }
        out
    }

    fn child_directions(
        &self,
        atom: NodeIndex,
        origin: Point,
        placed: &[NodeIndex],
        count: usize,
        component: &[NodeIndex],
    ) -> Vec<(Point, f64)> {
        if placed.is_empty() {
            return (0..count)
                .map(|i| {
                    let theta = -PI / 6.0 + TAU * i as f64 / count as f64;
                    (geometry::from_angle(theta), if i == 0 { -1.0 } else { 1.0 })
                })
                .collect();
        }

        let bearings: Vec<f64> = placed
            .iter()
            .filter_map(|nb| self.pos[nb.index()])
            .map(|p| geometry::angle(geometry::sub(p, origin)))
            .collect();

        if bearings.len() == 1 && self.system_of[atom.index()].is_none() {
            let forward = bearings[0] + PI;
            let turn = self.turn[atom.index()];
            if count == 1 {
                if self.is_linear(atom) {
                    return vec![(geometry::from_angle(forward), turn)];
                }
                return vec![self.zigzag(origin, forward, -turn, component)];
            }
            return (0..count)
                .map(|i| {
                    let offset = TAU * (i + 1) as f64 / (count + 1) as f64 - PI;
                    let sign = if offset.abs() < 1e-9 { -turn } else { offset.signum() };
                    (geometry::from_angle(forward + offset), sign)
                })
                .collect();
        }

        let (start, width) = widest_gap(&bearings);
        (0..count)
            .map(|i| {
                let theta = start + width * (i + 1) as f64 / (count + 1) as f64;
                (geometry::from_angle(theta), 1.0)
            })
            .collect()
    }

    /// Turn 60° off `forward`, preferring `sign` unless that side is crowded.
    fn zigzag(
        &self,
        origin: Point,
        forward: f64,
        sign: f64,
        component: &[NodeIndex],
    ) -> (Point, f64) {
        let preferred = geometry::from_angle(forward + sign * FRAC_PI_3);
        let other = geometry::from_angle(forward - sign * FRAC_PI_3);
        let room = |dir: Point| {
            self.clearance(geometry::add(origin, geometry::scale(dir, BOND_LENGTH)), component)
        };
        let (room_preferred, room_other) = (room(preferred), room(other));
        if room_preferred < 0.75 * BOND_LENGTH && room_other > room_preferred {
            (other, -sign)
        } else {
            (preferred, sign)
        }
    }

    fn clearance(&self, point: Point, component: &[NodeIndex]) -> f64 {
        component
            .iter()
            .filter_map(|a| self.pos[a.index()])
            .map(|p| geometry::distance(p, point))
            .fold(f64::INFINITY, f64::min)
    }

    /// Triple bond or cumulated double bonds: substituents sit at 180°.
    fn is_linear(&self, atom: NodeIndex) -> bool {
        let mut doubles = 0;
        for bond in self.mol.bonds_of(atom) {
            match self.mol.bond(bond).order {
                BondOrder::Triple => return true,
                BondOrder::Double => doubles += 1,
                BondOrder::Single => {}
            }
        }
        doubles >= 2
    }

    /// Drop a ring template so that `entry` sits one bond from `from` along
    /// `dir`, with the ring pointing away from `from`.
    fn attach_system(
        &mut self,
        system: usize,
        entry: NodeIndex,
        from: Point,
        dir: Point,
    ) -> Vec<NodeIndex> {
        let template = &self.templates[system];
        let Some(&local_entry) = template.get(&entry) else {
            return Vec::new();
        };
        let ring_center = geometry::centroid(
            self.mol
                .neighbors(entry)
                .filter_map(|nb| template.get(&nb).copied()),
        )
        .unwrap_or([0.0, 0.0]);
        let exterior = geometry::sub(local_entry, ring_center);
        let theta = geometry::angle(geometry::scale(dir, -1.0)) - geometry::angle(exterior);
        let target = geometry::add(from, geometry::scale(dir, BOND_LENGTH));

        let placed: Vec<(NodeIndex, Point)> = template
            .iter()
            .map(|(&atom, &p)| {
                let turned = geometry::rotate(geometry::sub(p, local_entry), theta);
                (atom, geometry::add(target, turned))
            })
            .collect();
        placed
            .into_iter()
            .map(|(atom, p)| {
                self.pos[atom.index()] = Some(p);
                atom
            })
            .collect()
    }

    /// Translate a placed component so its left edge sits at `left` and it
    /// is vertically centred on zero; returns its right edge.
    fn shift_component(&mut self, component: &[NodeIndex], left: f64) -> f64 {
        let placed = component.iter().filter_map(|a| self.pos[a.index()]);
        let Some((lo, hi)) = geometry::bounds(placed) else {
            return left;
        };
        let shift = [left - lo[0], -(lo[1] + hi[1]) / 2.0];
        for atom in component {
            if let Some(p) = self.pos[atom.index()] {
                self.pos[atom.index()] = Some(geometry::add(p, shift));
            }
        }
        hi[0] + shift[0]
    }
}

/// Start angle and width of the largest angular gap between `bearings`.
fn widest_gap(bearings: &[f64]) -> (f64, f64) {
    let mut sorted: Vec<f64> = bearings.iter().map(|b| b.rem_euclid(TAU)).collect();
    sorted.sort_by(f64::total_cmp);
    let mut best = (sorted[0], TAU);
    if sorted.len() > 1 {
        best.1 = 0.0;
        for i in 0..sorted.len() {
            let from = sorted[i];
            let to = if i + 1 < sorted.len() { sorted[i + 1] } else { sorted[0] + TAU };
            if to - from > best.1 + 1e-9 {
                best = (from, to - from);
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::from_smiles;
    use crate::traits::HasPosition2D;

    fn layout(smiles: &str) -> ParsedMolecule {
        generate_coordinates(&from_smiles(smiles).unwrap())
    }

    fn position(mol: &ParsedMolecule, i: usize) -> Point {
        mol.atom(NodeIndex::new(i)).position_2d().unwrap()
    }

    fn bond_lengths(mol: &ParsedMolecule) -> Vec<f64> {
        mol.bonds()
            .filter_map(|e| mol.bond_endpoints(e))
            .map(|(a, b)| geometry::distance(position(mol, a.index()), position(mol, b.index())))
            .collect()
    }

    fn min_nonbonded_distance(mol: &ParsedMolecule) -> f64 {
        let mut min = f64::INFINITY;
        for a in mol.atoms() {
            for b in mol.atoms().filter(|&b| b > a) {
                if mol.bond_between(a, b).is_none() {
                    let d = geometry::distance(position(mol, a.index()), position(mol, b.index()));
                    min = min.min(d);
                }
            }
        }
        min
    }

    #[test]
    fn every_atom_gets_a_position() {
        let mol = layout("CN1C=NC2=C1C(=O)N(C(=O)N2C)C");
        assert!(mol.atoms().all(|a| mol.atom(a).position_2d().is_some()));
    }

    #[test]
    fn bonds_have_uniform_length() {
        for smiles in [
            "CCCCCC",
            "CC(C)(C)C",
            "c1ccc2ccccc2c1",
            "CN(C)CCc1c[nH]c2ccccc12",
            "COc1cc(CCN)cc(OC)c1OC",
        ] {
            for d in bond_lengths(&layout(smiles)) {
                assert!((d - BOND_LENGTH).abs() < 1e-6, "{smiles}: bond of length {d}");
            }
        }
    }

    #[test]
    fn chains_zig_zag() {
        let mol = layout("CCCC");
        let p: Vec<Point> = (0..4).map(|i| position(&mol, i)).collect();
        // 1,3 distance of a 120° angle
        let expected = BOND_LENGTH * 3f64.sqrt();
        assert!((geometry::distance(p[0], p[2]) - expected).abs() < 1e-6);
        assert!((geometry::distance(p[1], p[3]) - expected).abs() < 1e-6);
        // trans, not folded back
        assert!(geometry::distance(p[0], p[3]) > 2.0 * BOND_LENGTH);
    }

    #[test]
    fn alkynes_are_straight() {
        let mol = layout("CC#CC");
        let expected = 3.0 * BOND_LENGTH;
        assert!((geometry::distance(position(&mol, 0), position(&mol, 3)) - expected).abs() < 1e-6);
    }

    #[test]
    fn substituents_do_not_collide() {
        for smiles in [
            "CC(N)Cc1ccccc1",
            "CNC(C)Cc1ccc2OCOc2c1",
            "CN(C)CCc1c[nH]c2ccccc12",
            "COc1cc(CCN)cc(OC)c1OC",
        ] {
            let d = min_nonbonded_distance(&layout(smiles));
            assert!(d > 0.5 * BOND_LENGTH, "{smiles}: atoms {d} apart");
        }
    }

    #[test]
    fn fragments_are_side_by_side() {
        let mol = layout("CCN.Cl");
        let chlorine = position(&mol, 3);
        for i in 0..3 {
            assert!(position(&mol, i)[0] + FRAGMENT_GAP * BOND_LENGTH <= chlorine[0] + 1e-9);
        }
    }

    #[test]
    fn deterministic() {
        let a = layout("CNC(C)Cc1ccc2OCOc2c1");
        let b = layout("CNC(C)Cc1ccc2OCOc2c1");
        for i in 0..a.atom_count() {
            assert_eq!(position(&a, i), position(&b, i));
        }
    }

    #[test]
    fn single_atom() {
        let mol = layout("C");
        assert_eq!(position(&mol, 0), [0.0, 0.0]);
    }

    #[test]
    fn widest_gap_between_two_bearings() {
        let (start, width) = widest_gap(&[0.0, FRAC_PI_3]);
        assert!((start - FRAC_PI_3).abs() < 1e-9);
        assert!((width - (TAU - FRAC_PI_3)).abs() < 1e-9);
    }
}
