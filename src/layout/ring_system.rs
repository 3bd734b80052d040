//! Rigid templates for fused, spiro, and bridged ring systems.

use std::collections::BTreeMap;
use std::f64::consts::{PI, TAU};

use petgraph::graph::NodeIndex;

use super::geometry::{self, Point};

/// Circumradius of a regular polygon with `n` sides of length `bond_length`.
pub fn polygon_radius(n: usize, bond_length: f64) -> f64 {
    bond_length / (2.0 * (PI / n as f64).sin())
}

/// Lay out the rings of one system in local coordinates.
///
/// The first ring becomes a regular polygon around the origin. Each later
/// ring is grown from the atoms it already shares with placed rings: a
/// shared edge gives an ortho-fused polygon, a shared atom a spiro polygon,
/// and a longer shared path an arc across the bridge.
pub fn layout(rings: &[&[NodeIndex]], bond_length: f64) -> BTreeMap<NodeIndex, Point> {
    let mut placed: BTreeMap<NodeIndex, Point> = BTreeMap::new();
    let mut done = vec![false; rings.len()];

    let Some(first) = largest_ring(rings) else {
        return placed;
    };
    place_polygon(rings[first], [0.0, 0.0], bond_length, &mut placed);
    done[first] = true;

    // Grow from the ring that shares the most atoms with what is placed.
    loop {
        let next = (0..rings.len()).filter(|&r| !done[r]).max_by_key(|&r| {
            let shared = rings[r].iter().filter(|a| placed.contains_key(a)).count();
            (shared, std::cmp::Reverse(r))
        });
        let Some(next) = next else {
            break;
        };
        done[next] = true;
        let ring = rings[next];
        if ring.iter().all(|a| !placed.contains_key(a)) {
            // Disjoint from the rest; only happens for inconsistent input.
            let offset = geometry::bounds(placed.values().copied())
                .map(|(_, hi)| [hi[0] + 2.0 * bond_length, 0.0])
                .unwrap_or([0.0, 0.0]);
            place_polygon(ring, offset, bond_length, &mut placed);
            continue;
        }
        for run in unplaced_runs(ring, &placed) {
            place_run(&run, ring.len(), bond_length, &mut placed);
        }
    }
    placed
}

fn largest_ring(rings: &[&[NodeIndex]]) -> Option<usize> {
    (0..rings.len()).max_by_key(|&r| (rings[r].len(), std::cmp::Reverse(r)))
}

fn place_polygon(
    ring: &[NodeIndex],
    center: Point,
    bond_length: f64,
    placed: &mut BTreeMap<NodeIndex, Point>,
) {
    let n = ring.len();
    let radius = polygon_radius(n, bond_length);
    // Start so that the first and last atom form a horizontal bottom edge.
    let start = -PI / 2.0 - PI / n as f64;
    for (i, &atom) in ring.iter().enumerate() {
        let theta = start - TAU * i as f64 / n as f64;
        let offset = geometry::scale(geometry::from_angle(theta), radius);
        placed.insert(atom, geometry::add(center, offset));
    }
}

/// A maximal stretch of unplaced ring atoms and its placed anchors.
struct Run {
    before: NodeIndex,
    after: NodeIndex,
    atoms: Vec<NodeIndex>,
}

fn unplaced_runs(ring: &[NodeIndex], placed: &BTreeMap<NodeIndex, Point>) -> Vec<Run> {
    let n = ring.len();
    let mut runs = Vec::new();
    for start in 0..n {
        let open =
            placed.contains_key(&ring[start]) && !placed.contains_key(&ring[(start + 1) % n]);
        if !open {
            continue;
        }
        let mut atoms = Vec::new();
        let mut i = (start + 1) % n;
        while !placed.contains_key(&ring[i]) {
            atoms.push(ring[i]);
            i = (i + 1) % n;
        }
        runs.push(Run {
            before: ring[start],
            after: ring[i],
            atoms,
        });
    }
    runs
}

fn place_run(
    run: &Run,
    ring_size: usize,
    bond_length: f64,
    placed: &mut BTreeMap<NodeIndex, Point>,
) {
    let (Some(&p), Some(&q)) = (placed.get(&run.before), placed.get(&run.after)) else {
        return;
    };
    let anchor_centroid = geometry::centroid(placed.values().copied()).unwrap_or(p);
    let radius = polygon_radius(ring_size, bond_length);

    let candidates: Vec<Vec<Point>> = if run.before == run.after {
        // spiro: the new ring hangs off a single atom
        let outward = geometry::normalize(geometry::sub(p, anchor_centroid));
        [outward, geometry::perpendicular(outward)]
            .into_iter()
            .map(|dir| spiro_arc(p, dir, radius, ring_size, run.atoms.len()))
            .collect()
    } else {
        let mid = geometry::scale(geometry::add(p, q), 0.5);
        let mut normal = geometry::perpendicular(geometry::normalize(geometry::sub(q, p)));
        if dot(normal, geometry::sub(mid, anchor_centroid)) < 0.0 {
            normal = geometry::scale(normal, -1.0);
        }
        [normal, geometry::scale(normal, -1.0)]
            .into_iter()
            .map(|n| bridge_arc(p, q, n, radius, run.atoms.len()))
            .collect()
    };

    // First candidate points away from the placed atoms; keep it unless it
    // lands on top of them and the other one does not.
    let anchors = [run.before, run.after];
    let clearance = |points: &[Point]| {
        points
            .iter()
            .flat_map(|pt| {
                placed
                    .iter()
                    .filter(|(atom, _)| !anchors.contains(*atom))
                    .map(move |(_, other)| geometry::distance(*pt, *other))
            })
            .fold(f64::INFINITY, f64::min)
    };
    let mut best = 0;
    for (i, points) in candidates.iter().enumerate().skip(1) {
        if clearance(points) > clearance(&candidates[best]) + 0.25 * bond_length {
            best = i;
        }
    }
    for (&atom, &pos) in run.atoms.iter().zip(&candidates[best]) {
        placed.insert(atom, pos);
    }
}

fn dot(a: Point, b: Point) -> f64 {
    a[0] * b[0] + a[1] * b[1]
}

fn spiro_arc(p: Point, dir: Point, radius: f64, ring_size: usize, count: usize) -> Vec<Point> {
    let center = geometry::add(p, geometry::scale(dir, radius));
    let start = geometry::angle(geometry::sub(p, center));
    (1..=count)
        .map(|i| {
            let theta = start + TAU * i as f64 / ring_size as f64;
            geometry::add(center, geometry::scale(geometry::from_angle(theta), radius))
        })
        .collect()
}

/// Points evenly spaced along the arc from `p` to `q` that bulges towards `normal`.
fn bridge_arc(p: Point, q: Point, normal: Point, radius: f64, count: usize) -> Vec<Point> {
    let half = geometry::distance(p, q) / 2.0;
    let radius = radius.max(half);
    let mid = geometry::scale(geometry::add(p, q), 0.5);
    let rise = (radius * radius - half * half).max(0.0).sqrt();
    let center = geometry::add(mid, geometry::scale(normal, rise));

    let from = geometry::angle(geometry::sub(p, center));
    let to = geometry::angle(geometry::sub(q, center));
    let ccw = (to - from).rem_euclid(TAU);
    let through = (geometry::angle(normal) - from).rem_euclid(TAU);
    let sweep = if through < ccw { ccw } else { ccw - TAU };

    (1..=count)
        .map(|i| {
            let theta = from + sweep * i as f64 / (count + 1) as f64;
            geometry::add(center, geometry::scale(geometry::from_angle(theta), radius))
        })
        .collect()
}
