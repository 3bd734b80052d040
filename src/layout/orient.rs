//! Orientation clean-up for generated layouts.

use std::f64::consts::PI;

use petgraph::graph::NodeIndex;

use super::geometry::{self, Point};
use crate::mol::Mol;
use crate::traits::HasPosition2D;

/// Bond directions are snapped to multiples of this angle.
const SNAP_STEP: f64 = PI / 6.0;

/// A bond counts as aligned within this many radians of a snap direction.
const ALIGN_TOLERANCE: f64 = 0.01;

/// Below this relative spread the layout has no principal axis.
const MIN_ANISOTROPY: f64 = 1e-3;

/// Negate every coordinate, a half turn about the origin.
pub fn reflect<A: HasPosition2D, B>(mol: &mut Mol<A, B>) {
    let atoms: Vec<NodeIndex> = mol.atoms().collect();
    for atom in atoms {
        let a = mol.atom_mut(atom);
        if let Some([x, y]) = a.position_2d() {
            a.set_position_2d(Some([-x, -y]));
        }
    }
}

/// Rotate the layout about its centroid so that it reads horizontally.
///
/// The principal axis of the atom positions is turned onto the x axis,
/// then the smallest extra rotation (at most 15° either way) that lines up
/// the most bonds with 30° directions is applied. Applying it twice gives
/// the same layout as applying it once.
pub fn straighten<A: HasPosition2D, B>(mol: &mut Mol<A, B>) {
    let points: Vec<Point> = mol.atoms().filter_map(|a| mol.atom(a).position_2d()).collect();
    let Some(center) = geometry::centroid(points.iter().copied()) else {
        return;
    };
    if points.len() < 2 {
        return;
    }

    if let Some(axis) = principal_axis(&points, center) {
        rotate_all(mol, center, -axis);
    }

    let bond_angles: Vec<f64> = mol
        .bonds()
        .filter_map(|e| mol.bond_endpoints(e))
        .filter_map(|(a, b)| {
            let pa = mol.atom(a).position_2d()?;
            let pb = mol.atom(b).position_2d()?;
            (geometry::distance(pa, pb) > 1e-9).then(|| geometry::angle(geometry::sub(pb, pa)))
        })
        .collect();
    let delta = snap_rotation(&bond_angles);
    if delta != 0.0 {
        rotate_all(mol, center, delta);
    }
}

/// Angle of the major principal axis in (-90°, 90°], if there is one.
fn principal_axis(points: &[Point], center: Point) -> Option<f64> {
    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for p in points {
        let [dx, dy] = geometry::sub(*p, center);
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    let trace = sxx + syy;
    if trace < 1e-12 {
        return None;
    }
    let spread = (sxx - syy).hypot(2.0 * sxy) / trace;
    (spread > MIN_ANISOTROPY).then(|| 0.5 * (2.0 * sxy).atan2(sxx - syy))
}

/// Offset from `angle` to the nearest snap direction, in (-15°, 15°].
fn snap_offset(angle: f64) -> f64 {
    let r = angle.rem_euclid(SNAP_STEP);
    if r > SNAP_STEP / 2.0 {
        SNAP_STEP - r
    } else {
        -r
    }
}

fn aligned_count(bond_angles: &[f64], delta: f64) -> usize {
    bond_angles
        .iter()
        .filter(|&&a| snap_offset(a + delta).abs() < ALIGN_TOLERANCE)
        .count()
}

/// Rotation that aligns the most bonds, preferring the smallest turn.
fn snap_rotation(bond_angles: &[f64]) -> f64 {
    let mut best: (usize, f64) = (aligned_count(bond_angles, 0.0), 0.0);
    for &a in bond_angles {
        let delta = snap_offset(a);
        let count = aligned_count(bond_angles, delta);
        let better = count > best.0
            || (count == best.0 && delta.abs() < best.1.abs() - 1e-12)
            || (count == best.0 && (delta.abs() - best.1.abs()).abs() <= 1e-12 && delta < best.1);
        if better {
            best = (count, delta);
        }
    }
    best.1
}

fn rotate_all<A: HasPosition2D, B>(mol: &mut Mol<A, B>, center: Point, theta: f64) {
    let atoms: Vec<NodeIndex> = mol.atoms().collect();
    for atom in atoms {
        let a = mol.atom_mut(atom);
        if let Some(p) = a.position_2d() {
            a.set_position_2d(Some(geometry::rotate_about(p, center, theta)));
        }
    }
}
